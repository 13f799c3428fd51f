//! Shared primitive types and small domain enums.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identities created in the external identity provider are keyed by UUID.
pub type IdentityId = uuid::Uuid;

// ---------------------------------------------------------------------------
// Payment method
// ---------------------------------------------------------------------------

/// How the guardian chose to pay tuition fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Hosted card checkout session.
    Stripe,
    /// Bank transfer with static remittance instructions; no online session.
    Cash,
}

impl PaymentMethod {
    /// Parse a payment method string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "stripe" => Ok(Self::Stripe),
            "cash" => Ok(Self::Cash),
            _ => Err(CoreError::Validation(format!(
                "Invalid payment method '{s}'. Must be one of: stripe, cash"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Cash => "cash",
        }
    }
}

// ---------------------------------------------------------------------------
// Guardian-student relationship type
// ---------------------------------------------------------------------------

/// Relationship between the enrolling guardian and the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Mother,
    Father,
    Guardian,
}

impl RelationshipType {
    /// Parse a relationship string from the database or a form payload.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "mother" => Ok(Self::Mother),
            "father" => Ok(Self::Father),
            "guardian" => Ok(Self::Guardian),
            _ => Err(CoreError::Validation(format!(
                "Invalid relationship '{s}'. Must be one of: mother, father, guardian"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Guardian => "guardian",
        }
    }
}
