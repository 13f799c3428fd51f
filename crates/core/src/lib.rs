//! Crestwood core domain logic.
//!
//! Pure, I/O-free building blocks shared by the API service and the intake
//! front-end: tuition pricing, course references, generated student
//! credentials, and the enrolment wizard state machine.

pub mod course;
pub mod credentials;
pub mod error;
pub mod pricing;
pub mod types;
pub mod wizard;
