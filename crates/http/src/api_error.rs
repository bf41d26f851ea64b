//! Typed API error for HTTP handlers.
//!
//! Converts service errors into RFC 7807 problem-details responses.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kaname_core::{PROBLEM_JSON, ProblemDetails};
use kaname_service::{ServiceError, validation_details};

/// API error with HTTP status code and human-readable detail.
///
/// `Internal` logs the real error server-side and returns a static detail
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed input from caller.
    BadRequest(String),
    /// 404 Not Found: requested resource doesn't exist.
    NotFound(String),
    /// 409 Conflict: unique constraint hit (e.g. email taken).
    Conflict(String),
    /// 422 Unprocessable Entity: well-formed body failing field validation.
    Unprocessable { detail: String, errors: BTreeMap<String, Vec<String>> },
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_problem(self) -> ProblemDetails {
        let (status, detail, errors) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, BTreeMap::new()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, BTreeMap::new()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg, BTreeMap::new()),
            Self::Unprocessable { detail, errors } => (StatusCode::UNPROCESSABLE_ENTITY, detail, errors),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned(), BTreeMap::new())
            },
        };
        ProblemDetails::new(status.as_u16(), status.canonical_reason().unwrap_or("Error"))
            .detail(detail)
            .errors(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.into_problem();
        let status = StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(problem)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(ref errors) => Self::Unprocessable {
                detail: "request body failed validation".to_owned(),
                errors: validation_details(errors),
            },
            ServiceError::InvalidParameter(msg) => Self::BadRequest(msg),
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ref e if e.is_duplicate() => Self::Conflict("a user with this email already exists".to_owned()),
            _ => Self::Internal(err.into()),
        }
    }
}
