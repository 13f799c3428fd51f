use std::sync::Arc;

use crestwood_db::EnrolmentStore;

use crate::clients::{IdentityProvider, PaymentGateway};
use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The external
/// collaborators are trait objects so tests can substitute in-memory and
/// mock implementations.
#[derive(Clone)]
pub struct AppState {
    /// Relational store (Postgres in production, in-memory in tests).
    pub store: Arc<dyn EnrolmentStore>,
    /// Identity provider for guardian and student accounts.
    pub identity: Arc<dyn IdentityProvider>,
    /// Payment gateway for hosted checkout sessions.
    pub payments: Arc<dyn PaymentGateway>,
    /// Shared fixed-window rate limiter.
    pub limiter: Arc<RateLimiter>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
