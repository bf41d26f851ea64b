//! Per-call pagination requests.
//!
//! Inputs are sanitized rather than rejected: a page or limit that is missing,
//! non-numeric, zero or negative falls back to the configured default.

use std::fmt;
use std::sync::Arc;

use kaname_core::DEFAULT_CURSOR_COLUMN;

use crate::codec::CursorCodec;
use crate::config::{CursorConfig, PagesConfig};

/// Parses a raw query-string value into a positive integer.
fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).and_then(|v| u64::try_from(v).ok()).filter(|v| *v > 0)
}

/// Request for one page of an offset-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: Option<u64>,
    include_count: Option<bool>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: None, include_count: None }
    }
}

impl PageRequest {
    /// Page `page` (1-based); values below 1 become 1.
    pub fn new(page: i64) -> Self {
        Self { page: u64::try_from(page).ok().filter(|p| *p > 0).unwrap_or(1), ..Self::default() }
    }

    /// Builds a request from untrusted text such as query-string values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self { page: positive(page).unwrap_or(1), limit: positive(limit), include_count: None }
    }

    /// Overrides the configured page size; values below 1 keep the default.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = u64::try_from(limit).ok().filter(|l| *l > 0);
        self
    }

    /// Caps the requested page size without raising it.
    #[must_use]
    pub fn cap_limit(mut self, max: u64) -> Self {
        self.limit = self.limit.map(|l| l.min(max.max(1)));
        self
    }

    #[must_use]
    pub const fn include_count(mut self, include: bool) -> Self {
        self.include_count = Some(include);
        self
    }

    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Merges this request with the registration-time defaults.
    pub fn resolve(&self, defaults: &PagesConfig) -> ResolvedPage {
        let limit = self.limit.unwrap_or_else(|| u64::from(defaults.limit.max(1)));
        ResolvedPage {
            page: self.page,
            limit,
            include_count: self.include_count.unwrap_or(defaults.include_page_count),
            offset: (self.page - 1).saturating_mul(limit),
        }
    }
}

/// A page request with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub page: u64,
    pub limit: u64,
    pub include_count: bool,
    pub offset: u64,
}

/// Request for one window of a cursor-paginated listing.
#[derive(Clone, Default)]
pub struct CursorRequest {
    cursor: Option<String>,
    limit: Option<u64>,
    column: Option<String>,
    codec: Option<Arc<dyn CursorCodec>>,
}

impl fmt::Debug for CursorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorRequest")
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .field("column", &self.column)
            .field("codec", &self.codec.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl CursorRequest {
    /// The first window.
    pub fn first() -> Self {
        Self::default()
    }

    /// The window following a previously returned `next_cursor`.
    pub fn after(cursor: impl Into<String>) -> Self {
        Self { cursor: Some(cursor.into()), ..Self::default() }
    }

    /// Builds a request from untrusted text. An empty cursor means the first window;
    /// any other cursor text is decoded later and may fail.
    pub fn from_raw(cursor: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            cursor: cursor.filter(|c| !c.is_empty()).map(ToOwned::to_owned),
            limit: positive(limit),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = u64::try_from(limit).ok().filter(|l| *l > 0);
        self
    }

    #[must_use]
    pub fn cap_limit(mut self, max: u64) -> Self {
        self.limit = self.limit.map(|l| l.min(max.max(1)));
        self
    }

    /// Cursor column override; defaults to `id`.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Codec override for this call only.
    #[must_use]
    pub fn codec(mut self, codec: impl CursorCodec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn resolve(&self, defaults: &CursorConfig) -> ResolvedCursor {
        ResolvedCursor {
            cursor: self.cursor.clone(),
            limit: self.limit.unwrap_or_else(|| u64::from(defaults.limit.max(1))),
            column: self.column.clone().unwrap_or_else(|| DEFAULT_CURSOR_COLUMN.to_owned()),
            codec: self.codec.clone().unwrap_or_else(|| Arc::clone(&defaults.codec)),
        }
    }
}

/// A cursor request with every default applied.
#[derive(Clone)]
pub struct ResolvedCursor {
    pub cursor: Option<String>,
    pub limit: u64,
    pub column: String,
    pub codec: Arc<dyn CursorCodec>,
}
