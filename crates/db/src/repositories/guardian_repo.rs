//! Repository for the `guardians` table.

use crestwood_core::types::DbId;
use sqlx::PgPool;

use crate::models::guardian::{CreateGuardian, Guardian};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, profile_id, email, phone, street, suburb, postcode, state, \
                       occupation, referral_source, relationship, created_at, updated_at";

/// Provides CRUD operations for guardians.
pub struct GuardianRepo;

impl GuardianRepo {
    /// Insert a new guardian, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGuardian) -> Result<Guardian, sqlx::Error> {
        let query = format!(
            "INSERT INTO guardians (profile_id, email, phone, street, suburb, postcode,
                                    state, occupation, referral_source, relationship)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guardian>(&query)
            .bind(input.profile_id)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.street)
            .bind(&input.suburb)
            .bind(&input.postcode)
            .bind(&input.state)
            .bind(&input.occupation)
            .bind(&input.referral_source)
            .bind(input.relationship.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a guardian by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guardian>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guardians WHERE id = $1");
        sqlx::query_as::<_, Guardian>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a guardian by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Guardian>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guardians WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Guardian>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Delete a guardian. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guardians WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
