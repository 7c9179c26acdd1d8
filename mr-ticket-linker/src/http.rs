//! Shared HTTP plumbing for the GitLab and Jira clients.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("mr-ticket-linker/", env!("CARGO_PKG_VERSION"));

/// Maximum number of characters of an error response body kept for reporting.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Transport and status failures shared by both REST APIs.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Credentials were rejected (HTTP 401).
    #[error("unauthorized (HTTP 401)")]
    Unauthorized,

    /// Credentials lack permission (HTTP 403).
    #[error("forbidden (HTTP 403)")]
    Forbidden,

    /// Resource does not exist or is hidden (HTTP 404).
    #[error("not found (HTTP 404)")]
    NotFound,

    /// Server-side failure (HTTP 5xx).
    #[error("server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-success status.
    #[error("unexpected status (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Connection, DNS or TLS failure.
    #[error("network error: {0}")]
    Network(String),
}

impl HttpError {
    fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            code @ 500..=599 => Self::Server { status: code, body },
            code => Self::Status { status: code, body },
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }
        if let Some(status) = e.status() {
            return Self::from_status(status, String::new());
        }
        Self::Network(e.to_string())
    }
}

/// Builds the HTTP client used for every request of a run.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(HttpError::from)
}

/// Passes 2xx responses through; anything else becomes an [`HttpError`]
/// carrying (a prefix of) the response body.
pub(crate) async fn check_status(response: Response) -> Result<Response, HttpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(HttpError::from_status(status, truncate_body(&body)))
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert!(matches!(
            HttpError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            HttpError::Unauthorized
        ));
        assert!(matches!(
            HttpError::from_status(StatusCode::FORBIDDEN, String::new()),
            HttpError::Forbidden
        ));
        assert!(matches!(
            HttpError::from_status(StatusCode::BAD_GATEWAY, "oops".to_string()),
            HttpError::Server { status: 502, .. }
        ));
        assert!(matches!(
            HttpError::from_status(StatusCode::BAD_REQUEST, "bad".to_string()),
            HttpError::Status { status: 400, .. }
        ));
    }

    #[test]
    fn truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("  short  "), "short");
    }
}
