//! Best-effort client identity extraction for rate limiting.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// The client's apparent IP address, taken from proxy headers.
///
/// Order of precedence: first entry of `x-forwarded-for`, then `x-real-ip`,
/// then the literal `"unknown"`. Behind a trusted reverse proxy this is the
/// real client address; a direct caller can spoof it, which only lets them
/// rate-limit themselves under a different key.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = header_value(parts, "x-forwarded-for").and_then(|list| {
            list.split(',')
                .next()
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .map(str::to_string)
        });

        let ip = forwarded
            .or_else(|| header_value(parts, "x-real-ip"))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIp(ip))
    }
}
