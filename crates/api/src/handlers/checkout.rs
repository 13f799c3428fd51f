//! POST /api/v1/checkout — create a hosted checkout session for an enrolment.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use crestwood_core::error::FieldError;
use crestwood_core::pricing;
use crestwood_core::types::DbId;
use crestwood_core::wizard::form::is_rfc_shaped_email;
use serde::{Deserialize, Serialize};

use crate::clients::{CheckoutMetadata, CheckoutSessionRequest};
use crate::error::{AppError, AppResult};
use crate::middleware::ClientIp;
use crate::state::AppState;

/// Max checkout attempts per client per window. Looser than enrolment since
/// guardians legitimately retry abandoned sessions.
pub const CHECKOUT_RATE_LIMIT: u32 = 8;
pub const CHECKOUT_RATE_WINDOW_SECS: i64 = 120;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub student_id: DbId,
    pub student_name: String,
    pub year_level: i32,
    /// Display string; may contain several comma-separated course names.
    pub course_name: String,
    pub parent_email: String,
    /// Explicit count, used by coarse pricing when no selections are sent.
    #[serde(default)]
    pub subject_count: Option<u32>,
    /// Per-subject selections; when present, granular pricing applies.
    #[serde(default)]
    pub selections: Option<Vec<CheckoutSelection>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSelection {
    pub course_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Hosted checkout URL to redirect the guardian to.
    pub url: String,
}

// ---------------------------------------------------------------------------
// Validation and pricing
// ---------------------------------------------------------------------------

fn validate_checkout(request: &CheckoutRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.student_name.trim().is_empty() {
        errors.push(FieldError::new("studentName", "Student name is required"));
    }
    if request.course_name.trim().is_empty() {
        errors.push(FieldError::new("courseName", "Course name is required"));
    }
    if !is_rfc_shaped_email(&request.parent_email) {
        errors.push(FieldError::new(
            "parentEmail",
            "Enter a valid email address",
        ));
    }
    if request.student_id <= 0 {
        errors.push(FieldError::new("studentId", "Invalid student id"));
    }
    if let Some(selections) = &request.selections {
        for (index, selection) in selections.iter().enumerate() {
            if selection.course_name.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("selections[{index}].courseName"),
                    "Course name is required",
                ));
            }
        }
    }

    errors
}

/// Total owed in cents. Granular per-selection pricing when selections are
/// present; otherwise coarse year-level pricing with the best available
/// subject count.
fn total_amount(request: &CheckoutRequest) -> i64 {
    if let Some(selections) = &request.selections {
        if !selections.is_empty() {
            let names: Vec<&str> = selections
                .iter()
                .map(|s| s.course_name.as_str())
                .collect();
            return pricing::granular_total(&names);
        }
    }

    let count = request
        .subject_count
        .unwrap_or_else(|| pricing::subject_count_from_course_names(&request.course_name));
    pricing::coarse_total(request.year_level, count)
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

pub async fn checkout(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    // 1. Rate limit per client.
    let decision = state.limiter.check(
        &format!("{ip}:checkout"),
        CHECKOUT_RATE_LIMIT,
        Duration::seconds(CHECKOUT_RATE_WINDOW_SECS),
    );
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs(Utc::now()),
        });
    }

    // 2. Validate.
    let errors = validate_checkout(&request);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // 3. Price the enrolment.
    let amount_minor = total_amount(&request);

    // 4. Create the hosted session.
    let session = state
        .payments
        .create_checkout_session(&CheckoutSessionRequest {
            amount_minor,
            currency: state.config.payment.currency.clone(),
            product_name: format!(
                "Tuition: {} ({})",
                request.course_name.trim(),
                request.student_name.trim()
            ),
            customer_email: request.parent_email.trim().to_string(),
            success_url: state.config.payment.success_url.clone(),
            cancel_url: state.config.payment.cancel_url.clone(),
            metadata: CheckoutMetadata {
                student_id: request.student_id,
                student_name: request.student_name.trim().to_string(),
                year_level: request.year_level,
                course_name: request.course_name.trim().to_string(),
                parent_email: request.parent_email.trim().to_string(),
            },
        })
        .await?;

    // 5. Record the session against the student. Best effort: the guardian
    //    already has a payable session, so a failed write must not block
    //    the redirect. The webhook reconciles payment status later.
    if let Err(e) = state
        .store
        .set_checkout_session(request.student_id, &session.id)
        .await
    {
        tracing::warn!(
            student_id = request.student_id,
            session_id = %session.id,
            error = %e,
            "failed to record checkout session"
        );
    }

    Ok(Json(CheckoutResponse { url: session.url }))
}
