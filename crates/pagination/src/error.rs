use thiserror::Error;

/// Why a cursor token could not be turned back into a column value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorDecodeError {
    #[error("cursor is empty")]
    Empty,

    #[error("cursor is not valid base64")]
    Encoding,

    #[error("cursor is not valid UTF-8")]
    Utf8,

    #[error("expected an integer position, got {0:?}")]
    NotAnInteger(String),
}

/// Pagination failure: either a bad parameter or the model's own query error.
#[derive(Debug, Error)]
pub enum PaginationError<E>
where
    E: std::error::Error + 'static,
{
    #[error("invalid cursor {cursor:?}: {source}")]
    InvalidCursor {
        cursor: String,
        #[source]
        source: CursorDecodeError,
    },

    #[error("column `{0}` cannot back a cursor")]
    UnknownCursorColumn(String),

    #[error("row has no value for cursor column `{0}`")]
    MissingCursorValue(String),

    #[error(transparent)]
    Query(E),
}

impl<E> PaginationError<E>
where
    E: std::error::Error + 'static,
{
    /// Whether the caller supplied bad input (as opposed to a query failure).
    pub const fn is_parameter_error(&self) -> bool {
        matches!(self, Self::InvalidCursor { .. } | Self::UnknownCursorColumn(_))
    }

    /// Converts the wrapped query error, keeping parameter errors as they are.
    pub fn map_query<F, M>(self, f: M) -> PaginationError<F>
    where
        F: std::error::Error + 'static,
        M: FnOnce(E) -> F,
    {
        match self {
            Self::InvalidCursor { cursor, source } => PaginationError::InvalidCursor { cursor, source },
            Self::UnknownCursorColumn(column) => PaginationError::UnknownCursorColumn(column),
            Self::MissingCursorValue(column) => PaginationError::MissingCursorValue(column),
            Self::Query(err) => PaginationError::Query(f(err)),
        }
    }
}
