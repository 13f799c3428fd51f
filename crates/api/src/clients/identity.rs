//! Identity provider client (admin users API).

use std::time::Duration;

use async_trait::async_trait;
use crestwood_core::types::IdentityId;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider already has an account for this email.
    #[error("email is already registered")]
    AlreadyRegistered,

    #[error("identity provider timed out")]
    Timeout,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Account to create with the identity provider.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Forces a password change on first login (student accounts get a
    /// one-time password).
    pub must_reset_password: bool,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its identity id.
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, IdentityError>;

    /// Delete an account. Used only by saga compensation.
    async fn delete_user(&self, id: IdentityId) -> Result<(), IdentityError>;
}

/// HTTP implementation talking to the provider's admin API with a
/// service-role bearer token.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, service_key: &str) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Provider(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct CreatedUser {
    id: IdentityId,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    #[serde(alias = "msg", alias = "message")]
    error: Option<String>,
}

fn map_transport(err: reqwest::Error) -> IdentityError {
    if err.is_timeout() {
        IdentityError::Timeout
    } else {
        IdentityError::Provider(err.to_string())
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, IdentityError> {
        let response = self
            .http
            .post(format!("{}/admin/users", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&json!({
                "email": identity.email,
                "password": identity.password,
                "email_confirm": true,
                "user_metadata": {
                    "display_name": identity.display_name,
                    "must_reset_password": identity.must_reset_password,
                },
            }))
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status.is_success() {
            let created: CreatedUser = response.json().await.map_err(map_transport)?;
            return Ok(created.id);
        }

        let body: ProviderErrorBody = response.json().await.unwrap_or(ProviderErrorBody {
            error: None,
        });
        let message = body.error.unwrap_or_else(|| status.to_string());

        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || message.to_lowercase().contains("already")
        {
            return Err(IdentityError::AlreadyRegistered);
        }
        Err(IdentityError::Provider(message))
    }

    async fn delete_user(&self, id: IdentityId) -> Result<(), IdentityError> {
        let response = self
            .http
            .delete(format!("{}/admin/users/{id}", self.base_url))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(map_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(IdentityError::Provider(response.status().to_string()))
        }
    }
}
