//! Guardian entity model and DTOs.

use crestwood_core::types::{DbId, RelationshipType, Timestamp};
use sqlx::FromRow;

/// Full guardian row from the `guardians` table.
///
/// Contains contact PII -- never serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct Guardian {
    pub id: DbId,
    pub profile_id: DbId,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
    pub occupation: Option<String>,
    pub referral_source: String,
    /// Relationship to the student, stored as text (see [`RelationshipType`]).
    pub relationship: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new guardian record.
#[derive(Debug, Clone)]
pub struct CreateGuardian {
    pub profile_id: DbId,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
    pub occupation: Option<String>,
    pub referral_source: String,
    pub relationship: RelationshipType,
}
