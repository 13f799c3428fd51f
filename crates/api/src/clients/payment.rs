//! Payment gateway client (hosted checkout sessions).

use std::time::Duration;

use async_trait::async_trait;
use crestwood_core::types::DbId;
use serde::Deserialize;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway timed out")]
    Timeout,

    #[error("payment gateway error: {0}")]
    Gateway(String),
}

/// Metadata attached to a checkout session so webhooks and the dashboard
/// can tie the payment back to the enrolment.
#[derive(Debug, Clone)]
pub struct CheckoutMetadata {
    pub student_id: DbId,
    pub student_name: String,
    pub year_level: i32,
    pub course_name: String,
    pub parent_email: String,
}

/// Request for a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    /// Amount in minor units (cents).
    pub amount_minor: i64,
    pub currency: String,
    pub product_name: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: CheckoutMetadata,
}

/// A created checkout session the guardian is redirected to.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// HTTP implementation using the gateway's form-encoded sessions API.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str, secret_key: &str) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: Option<GatewayErrorDetail>,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    message: Option<String>,
}

fn map_transport(err: reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::Timeout
    } else {
        PaymentError::Gateway(err.to_string())
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("success_url".into(), request.success_url.clone()),
            ("cancel_url".into(), request.cancel_url.clone()),
            ("customer_email".into(), request.customer_email.clone()),
            (
                "line_items[0][price_data][currency]".into(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                request.amount_minor.to_string(),
            ),
            ("line_items[0][quantity]".into(), "1".into()),
            (
                "metadata[student_id]".into(),
                request.metadata.student_id.to_string(),
            ),
            (
                "metadata[student_name]".into(),
                request.metadata.student_name.clone(),
            ),
            (
                "metadata[year_level]".into(),
                request.metadata.year_level.to_string(),
            ),
            (
                "metadata[course_name]".into(),
                request.metadata.course_name.clone(),
            ),
            (
                "metadata[parent_email]".into(),
                request.metadata.parent_email.clone(),
            ),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(map_transport);
        }

        let body: GatewayErrorBody = response
            .json()
            .await
            .unwrap_or(GatewayErrorBody { error: None });
        let message = body
            .error
            .and_then(|detail| detail.message)
            .unwrap_or_else(|| status.to_string());
        Err(PaymentError::Gateway(message))
    }
}
