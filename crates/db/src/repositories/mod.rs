//! Repository structs, one per table.
//!
//! Each repository provides static async CRUD methods over a [`sqlx::PgPool`].
//! Deletes exist because the enrolment saga compensates partial provisioning
//! by removing already-created rows.

pub mod guardian_repo;
pub mod profile_repo;
pub mod relationship_repo;
pub mod student_repo;

pub use guardian_repo::GuardianRepo;
pub use profile_repo::ProfileRepo;
pub use relationship_repo::RelationshipRepo;
pub use student_repo::StudentRepo;
