//! The [`EnrolmentStore`] trait and its Postgres implementation.
//!
//! The enrolment saga and the payment initiator write through this trait so
//! the HTTP layer can be exercised against [`crate::memory`] in tests while
//! production runs against Postgres.

use async_trait::async_trait;
use crestwood_core::types::DbId;

use crate::models::{
    CreateGuardian, CreateProfile, CreateRelationship, CreateStudent, Guardian, Profile,
    Relationship, Student,
};
use crate::repositories::{GuardianRepo, ProfileRepo, RelationshipRepo, StudentRepo};
use crate::DbPool;

/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations the enrolment and payment flows need.
///
/// The delete methods exist for saga compensation; they are not part of any
/// public API surface.
#[async_trait]
pub trait EnrolmentStore: Send + Sync {
    async fn create_profile(&self, input: &CreateProfile) -> Result<Profile, StoreError>;
    async fn delete_profile(&self, id: DbId) -> Result<(), StoreError>;

    async fn create_guardian(&self, input: &CreateGuardian) -> Result<Guardian, StoreError>;
    async fn delete_guardian(&self, id: DbId) -> Result<(), StoreError>;

    async fn create_student(&self, input: &CreateStudent) -> Result<Student, StoreError>;
    async fn delete_student(&self, id: DbId) -> Result<(), StoreError>;

    async fn create_relationship(
        &self,
        input: &CreateRelationship,
    ) -> Result<Relationship, StoreError>;

    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError>;

    /// Record an opened checkout session on the student and mark payment
    /// status `pending`.
    async fn set_checkout_session(&self, student_id: DbId, session_id: &str)
        -> Result<(), StoreError>;

    /// Whether the backing store is reachable.
    async fn healthy(&self) -> bool;
}

/// Postgres-backed [`EnrolmentStore`] delegating to the repositories.
#[derive(Clone)]
pub struct PgEnrolmentStore {
    pool: DbPool,
}

impl PgEnrolmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrolmentStore for PgEnrolmentStore {
    async fn create_profile(&self, input: &CreateProfile) -> Result<Profile, StoreError> {
        Ok(ProfileRepo::create(&self.pool, input).await?)
    }

    async fn delete_profile(&self, id: DbId) -> Result<(), StoreError> {
        ProfileRepo::delete(&self.pool, id).await?;
        Ok(())
    }

    async fn create_guardian(&self, input: &CreateGuardian) -> Result<Guardian, StoreError> {
        Ok(GuardianRepo::create(&self.pool, input).await?)
    }

    async fn delete_guardian(&self, id: DbId) -> Result<(), StoreError> {
        GuardianRepo::delete(&self.pool, id).await?;
        Ok(())
    }

    async fn create_student(&self, input: &CreateStudent) -> Result<Student, StoreError> {
        Ok(StudentRepo::create(&self.pool, input).await?)
    }

    async fn delete_student(&self, id: DbId) -> Result<(), StoreError> {
        StudentRepo::delete(&self.pool, id).await?;
        Ok(())
    }

    async fn create_relationship(
        &self,
        input: &CreateRelationship,
    ) -> Result<Relationship, StoreError> {
        Ok(RelationshipRepo::create(&self.pool, input).await?)
    }

    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        Ok(StudentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn set_checkout_session(
        &self,
        student_id: DbId,
        session_id: &str,
    ) -> Result<(), StoreError> {
        let updated = StudentRepo::set_checkout_session(&self.pool, student_id, session_id).await?;
        if !updated {
            return Err(StoreError::NotFound {
                entity: "Student",
                id: student_id,
            });
        }
        Ok(())
    }

    async fn healthy(&self) -> bool {
        crate::health_check(&self.pool).await.is_ok()
    }
}
