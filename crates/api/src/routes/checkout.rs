use axum::{routing::post, Router};

use crate::handlers::checkout;
use crate::state::AppState;

/// Mount checkout routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout::checkout))
}
