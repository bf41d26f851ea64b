//! Typed error enum for the client crate.

use kaname_core::ProblemDetails;
use thiserror::Error;

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Server answered with a problem-details body.
    #[error("API error {}: {}", .0.status, .0.title)]
    Api(ProblemDetails),
    /// Non-2xx answer without a problem-details body (e.g. a 401 from auth).
    #[error("HTTP status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl ClientError {
    /// HTTP status of a server-side failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(problem) => Some(problem.status),
            Self::Status { code, .. } => Some(*code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::ClientInit(_) => None,
        }
    }
}
