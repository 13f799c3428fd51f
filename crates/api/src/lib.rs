//! Crestwood enrolment API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! external clients, provisioning saga) so integration tests and the binary
//! entrypoint can both access them.

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod provisioning;
pub mod routes;
pub mod state;
