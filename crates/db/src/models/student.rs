//! Student entity model and DTOs.

use chrono::NaiveDate;
use crestwood_core::error::CoreError;
use crestwood_core::types::{DbId, PaymentMethod, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Payment lifecycle for a student's enrolment fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment initiated yet.
    Unpaid,
    /// A hosted checkout session has been opened.
    Pending,
    /// The gateway confirmed payment (set by the downstream webhook).
    Paid,
    /// The gateway reported failure.
    Failed,
}

impl PaymentStatus {
    /// Parse a payment status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::Validation(format!(
                "Invalid payment status '{s}'. Must be one of: unpaid, pending, paid, failed"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

/// Full student row from the `students` table.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: DbId,
    pub profile_id: DbId,
    /// Generated login handle, format `STU` + 6 digits.
    pub student_number: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub school_name: String,
    pub grade_level: i32,
    /// Comma-joined subject labels, for display.
    pub subjects: String,
    /// Comma-joined course names, for display.
    pub courses: String,
    /// Comma-joined class names, for display.
    pub classes: String,
    pub payment_method: String,
    pub payment_status: String,
    pub checkout_session_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new student record.
#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub profile_id: DbId,
    pub student_number: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub school_name: String,
    pub grade_level: i32,
    pub subjects: String,
    pub courses: String,
    pub classes: String,
    pub payment_method: PaymentMethod,
}
