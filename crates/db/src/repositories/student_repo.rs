//! Repository for the `students` table.

use crestwood_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, PaymentStatus, Student};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, profile_id, student_number, gender, date_of_birth, school_name, \
                       grade_level, subjects, courses, classes, payment_method, \
                       payment_status, checkout_session_id, created_at, updated_at";

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (profile_id, student_number, gender, date_of_birth,
                                   school_name, grade_level, subjects, courses, classes,
                                   payment_method)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(input.profile_id)
            .bind(&input.student_number)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.school_name)
            .bind(input.grade_level)
            .bind(&input.subjects)
            .bind(&input.courses)
            .bind(&input.classes)
            .bind(input.payment_method.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a student by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a student by generated student number.
    pub async fn find_by_student_number(
        pool: &PgPool,
        student_number: &str,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE student_number = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(student_number)
            .fetch_optional(pool)
            .await
    }

    /// Record an opened checkout session and mark payment as pending.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_checkout_session(
        pool: &PgPool,
        id: DbId,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students SET
                checkout_session_id = $2,
                payment_status = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(session_id)
        .bind(PaymentStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a student. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
