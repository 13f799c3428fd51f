//! Server configuration loaded from environment variables.

/// Identity provider (admin users API) settings.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the identity provider's admin API.
    pub base_url: String,
    /// Service-role key sent as a bearer token.
    pub service_key: String,
}

/// Payment gateway (hosted checkout) settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Base URL of the payment gateway API.
    pub base_url: String,
    /// Secret API key.
    pub secret_key: String,
    /// ISO currency code for checkout sessions.
    pub currency: String,
    /// Destination after a successful payment.
    pub success_url: String,
    /// Destination when the guardian abandons checkout.
    pub cancel_url: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Minimum guardian password length (default: `8`).
    pub min_password_length: usize,
    /// Domain for synthetic student emails (default:
    /// `students.crestwood.edu.au`).
    pub student_email_domain: String,
    pub identity: IdentityConfig,
    pub payment: PaymentConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                        |
    /// | `PORT`                   | `3000`                           |
    /// | `CORS_ORIGINS`           | `http://localhost:3001`          |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                             |
    /// | `MIN_PASSWORD_LENGTH`    | `8`                              |
    /// | `STUDENT_EMAIL_DOMAIN`   | `students.crestwood.edu.au`      |
    /// | `IDENTITY_BASE_URL`      | `http://localhost:9999`          |
    /// | `IDENTITY_SERVICE_KEY`   | (empty)                          |
    /// | `PAYMENT_BASE_URL`       | `https://api.stripe.com`         |
    /// | `PAYMENT_SECRET_KEY`     | (empty)                          |
    /// | `PAYMENT_CURRENCY`       | `aud`                            |
    /// | `CHECKOUT_SUCCESS_URL`   | `http://localhost:3001/enrol/success` |
    /// | `CHECKOUT_CANCEL_URL`    | `http://localhost:3001/enrol/payment` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let student_email_domain = std::env::var("STUDENT_EMAIL_DOMAIN")
            .unwrap_or_else(|_| "students.crestwood.edu.au".into());

        let identity = IdentityConfig {
            base_url: std::env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9999".into()),
            service_key: std::env::var("IDENTITY_SERVICE_KEY").unwrap_or_default(),
        };

        let payment = PaymentConfig {
            base_url: std::env::var("PAYMENT_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "aud".into()),
            success_url: std::env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3001/enrol/success".into()),
            cancel_url: std::env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3001/enrol/payment".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            min_password_length,
            student_email_domain,
            identity,
            payment,
        }
    }
}
