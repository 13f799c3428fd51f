//! API error type and HTTP response mapping.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use crestwood_core::error::{CoreError, FieldError};
use crestwood_db::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::clients::{IdentityError, PaymentError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Conflict(String),

    /// Fixed-window rate limit exceeded for this client.
    #[error("too many requests")]
    RateLimited { retry_after_secs: i64 },

    /// Failure in an external collaborator (identity provider, payment
    /// gateway). Details are logged, never returned to the client.
    #[error("{0}")]
    Upstream(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::AlreadyRegistered => {
                Self::Conflict("This email is already registered. Please log in instead.".into())
            }
            IdentityError::Timeout => Self::Upstream("identity provider timed out".into()),
            IdentityError::Provider(msg) => Self::Upstream(msg),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Timeout => Self::Upstream("payment gateway timed out".into()),
            PaymentError::Gateway(msg) => Self::Upstream(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(fields) => {
                let mut map = serde_json::Map::new();
                for field in fields {
                    map.insert(field.field.clone(), json!(field.message));
                }
                let body = json!({
                    "error": "Validation failed",
                    "code": "VALIDATION_ERROR",
                    "fields": map,
                });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::RateLimited { retry_after_secs } => {
                let body = json!({
                    "error": "Too many requests. Please try again shortly.",
                    "code": "RATE_LIMITED",
                });
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                if let Ok(value) = retry_after_secs.to_string().parse() {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return response;
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Core(err) => match err {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Something went wrong. Please try again.".into(),
                    )
                }
            },
            AppError::Store(err) => match err {
                StoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                StoreError::Database(db_err) => {
                    tracing::error!(error = %db_err, "database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Something went wrong. Please try again.".into(),
                    )
                }
            },
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream service error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Something went wrong. Please try again.".into(),
                )
            }
        };

        let body = json!({ "error": message, "code": code });
        (status, Json(body)).into_response()
    }
}
