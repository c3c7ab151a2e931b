use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {service}")]
    UpstreamStatus { service: String, status: u16 },

    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // reqwest errors carry the request URL, which may include credentials
            Error::Http(e) if e.is_timeout() => "External HTTP request timed out".to_string(),
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Internal(msg) | Error::Config(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("secret") || lower.contains("token") || lower.contains("key=")
                {
                    "Error details redacted".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),

            Error::UpstreamStatus { .. }
            | Error::UnexpectedResponse(_)
            | Error::NotFound(_)
            | Error::Validation(_)
            | Error::Template(_) => self.to_string(),
        }
    }

    /// Whether the failure originated in a third-party service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::UpstreamStatus { .. } | Error::UnexpectedResponse(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            e if e.is_upstream() => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
