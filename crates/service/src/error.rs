//! Typed error enum for the service layer.

use std::collections::BTreeMap;

use kaname_pagination::PaginationError;
use kaname_storage::StorageError;
use thiserror::Error;
use validator::ValidationErrors;

/// Service-layer error unifying storage, validation and pagination failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Request body failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Caller supplied an unusable parameter (malformed cursor, unknown column).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Invariant broken inside the service; never caused by the caller.
    #[error("internal: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Storage(StorageError::NotFound { .. }))
    }
}

impl From<PaginationError<StorageError>> for ServiceError {
    fn from(err: PaginationError<StorageError>) -> Self {
        match err {
            PaginationError::Query(e) => Self::Storage(e),
            PaginationError::MissingCursorValue(_) => Self::Internal(err.to_string()),
            PaginationError::InvalidCursor { .. } | PaginationError::UnknownCursorColumn(_) => {
                Self::InvalidParameter(err.to_string())
            },
        }
    }
}

/// Field name → messages, for error bodies.
pub fn validation_details(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), ToString::to_string))
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
