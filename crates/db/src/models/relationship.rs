//! Guardian-student relationship model and DTOs.
//!
//! Exactly one relationship row is created per successful enrolment
//! submission.

use crestwood_core::types::{DbId, RelationshipType, Timestamp};
use sqlx::FromRow;

/// Full relationship row from the `relationships` table.
#[derive(Debug, Clone, FromRow)]
pub struct Relationship {
    pub id: DbId,
    pub guardian_id: DbId,
    pub student_id: DbId,
    /// Stored as text (see [`RelationshipType`]).
    pub relationship_type: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new relationship record.
#[derive(Debug, Clone)]
pub struct CreateRelationship {
    pub guardian_id: DbId,
    pub student_id: DbId,
    pub relationship_type: RelationshipType,
}
