//! Profile entity model and DTOs.
//!
//! A profile links an identity-provider account (UUID) to its role in the
//! academy. Guardians and students each get exactly one.

use crestwood_core::error::CoreError;
use crestwood_core::types::{DbId, IdentityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role a profile plays in the academy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Guardian,
    Student,
}

impl ProfileRole {
    /// Parse a role string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "guardian" => Ok(Self::Guardian),
            "student" => Ok(Self::Student),
            _ => Err(CoreError::Validation(format!(
                "Invalid profile role '{s}'. Must be one of: guardian, student"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::Student => "student",
        }
    }
}

/// Full profile row from the `profiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub identity_id: IdentityId,
    pub full_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new profile.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub identity_id: IdentityId,
    pub full_name: String,
    pub role: ProfileRole,
}
