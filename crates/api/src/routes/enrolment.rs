use axum::{routing::post, Router};

use crate::handlers::enrolment;
use crate::state::AppState;

/// Mount enrolment routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/enrol", post(enrolment::enrol))
}
