use reqwest::StatusCode;
use thiserror::Error;

/// Failures while building credentials or issuing a developer token.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("invalid credentials: key id, team id, service id and private key must be non-empty")]
    InvalidCredentials,

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("failed to sign developer token: {0}")]
    SigningFailure(#[source] jsonwebtoken::errors::Error),
}

/// Request-level failures surfaced by [`crate::Client`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("weatherkit failed to get token: {0}")]
    Token(#[from] CredentialsError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WeatherKit responded with status {status}{}", reason_suffix(.reason))]
    Api {
        status: StatusCode,
        reason: Option<String>,
    },

    #[error("failed to decompress response body: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
