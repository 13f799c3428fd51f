//! Repository for the `relationships` table.

use crestwood_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::{CreateRelationship, Relationship};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, guardian_id, student_id, relationship_type, created_at";

/// Provides CRUD operations for guardian-student relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a new relationship, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRelationship,
    ) -> Result<Relationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO relationships (guardian_id, student_id, relationship_type)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(input.guardian_id)
            .bind(input.student_id)
            .bind(input.relationship_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// List all relationships for a guardian.
    pub async fn list_for_guardian(
        pool: &PgPool,
        guardian_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships WHERE guardian_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(guardian_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a relationship. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relationships WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
