#![allow(dead_code)]

//! Shared harness for API integration tests: an in-memory store, mock
//! external clients, and oneshot request helpers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crestwood_api::clients::{
    CheckoutSession, CheckoutSessionRequest, IdentityError, IdentityProvider, NewIdentity,
    PaymentError, PaymentGateway,
};
use crestwood_api::config::{IdentityConfig, PaymentConfig, ServerConfig};
use crestwood_api::middleware::RateLimiter;
use crestwood_api::routes;
use crestwood_api::state::AppState;
use crestwood_core::types::IdentityId;
use crestwood_db::memory::InMemoryEnrolmentStore;

// ---------------------------------------------------------------------------
// Mock identity provider
// ---------------------------------------------------------------------------

#[derive(Default)]
struct IdentityState {
    registered: HashSet<String>,
    created: Vec<IdentityId>,
    deleted: Vec<IdentityId>,
    /// Fail any creation once this many accounts exist.
    fail_after: Option<usize>,
}

#[derive(Default)]
pub struct MockIdentityProvider {
    state: Mutex<IdentityState>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already knows these emails.
    pub fn with_registered(emails: &[&str]) -> Self {
        let provider = Self::new();
        {
            let mut state = provider.state.lock().unwrap();
            state.registered = emails.iter().map(|e| e.to_lowercase()).collect();
        }
        provider
    }

    /// Provider that fails every creation after `n` successful ones.
    pub fn failing_after(n: usize) -> Self {
        let provider = Self::new();
        provider.state.lock().unwrap().fail_after = Some(n);
        provider
    }

    pub fn created(&self) -> Vec<IdentityId> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn deleted(&self) -> Vec<IdentityId> {
        self.state.lock().unwrap().deleted.clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, IdentityError> {
        let mut state = self.state.lock().unwrap();
        let email = identity.email.to_lowercase();
        if state.registered.contains(&email) {
            return Err(IdentityError::AlreadyRegistered);
        }
        if let Some(limit) = state.fail_after {
            if state.created.len() >= limit {
                return Err(IdentityError::Provider("induced identity failure".into()));
            }
        }
        let id = Uuid::new_v4();
        state.registered.insert(email);
        state.created.push(id);
        Ok(id)
    }

    async fn delete_user(&self, id: IdentityId) -> Result<(), IdentityError> {
        let mut state = self.state.lock().unwrap();
        state.deleted.push(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Mock payment gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockPaymentGateway {
    last: Mutex<Option<CheckoutSessionRequest>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent session request, if any.
    pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_123".into(),
            url: "https://checkout.test/cs_test_123".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

pub struct TestContext {
    pub app: Router,
    pub store: Arc<InMemoryEnrolmentStore>,
    pub identity: Arc<MockIdentityProvider>,
    pub payments: Arc<MockPaymentGateway>,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".into()],
        request_timeout_secs: 5,
        min_password_length: 8,
        student_email_domain: "students.crestwood.test".into(),
        identity: IdentityConfig {
            base_url: "http://identity.test".into(),
            service_key: "test-service-key".into(),
        },
        payment: PaymentConfig {
            base_url: "http://payments.test".into(),
            secret_key: "sk_test".into(),
            currency: "aud".into(),
            success_url: "http://localhost:3001/enrol/success".into(),
            cancel_url: "http://localhost:3001/enrol/payment".into(),
        },
    }
}

pub fn context() -> TestContext {
    context_with_identity(MockIdentityProvider::new())
}

pub fn context_with_identity(identity: MockIdentityProvider) -> TestContext {
    let store = Arc::new(InMemoryEnrolmentStore::new());
    let identity = Arc::new(identity);
    let payments = Arc::new(MockPaymentGateway::new());

    let state = AppState {
        store: store.clone(),
        identity: identity.clone(),
        payments: payments.clone(),
        limiter: Arc::new(RateLimiter::new()),
        config: Arc::new(test_config()),
    };

    TestContext {
        app: routes::app(state),
        store,
        identity,
        payments,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn post_request(path: &str, ip: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn post_json(app: &Router, path: &str, ip: &str, body: &Value) -> (StatusCode, Value) {
    let response = send(app, post_request(path, ip, body)).await;
    read_json(response).await
}

pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    read_json(send(app, request).await).await
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// A complete, valid enrolment submission for a year 11 student with two
/// subject selections.
pub fn enrol_body(parent_email: &str) -> Value {
    json!({
        "parent": {
            "firstName": "Jane",
            "lastName": "Doe",
            "email": parent_email,
            "password": "hunter2hunter2",
            "phone": "0412 345 678",
            "relationship": "mother",
            "referralSource": "google",
            "occupation": "Engineer",
            "street": "1 Main St",
            "suburb": "Epping",
            "postcode": "2121",
            "state": "NSW"
        },
        "student": {
            "name": "Sam Doe",
            "gender": "male",
            "dateOfBirth": "2009-06-15",
            "schoolName": "Epping High",
            "gradeLevel": 11
        },
        "selection": {
            "subjects": [
                {
                    "subject": "Mathematics",
                    "course": "maths-adv",
                    "courseName": "Year 11 Mathematics Advanced",
                    "classId": "cls_01",
                    "className": "Year 11 Maths A"
                },
                {
                    "subject": "Chemistry",
                    "course": "chem|year11",
                    "courseName": "Year 11 Chemistry",
                    "classId": "cls_02",
                    "className": "Year 11 Chem B"
                }
            ]
        },
        "paymentMethod": "stripe"
    })
}
