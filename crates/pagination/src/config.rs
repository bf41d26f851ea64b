use std::fmt;
use std::sync::Arc;

use kaname_core::{CursorEncoding, DEFAULT_CURSOR_LIMIT, DEFAULT_PAGE_LIMIT, PaginationSection};

use crate::codec::{Base64Cursor, CursorCodec, PlainCursor};

/// Defaults for page-based pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagesConfig {
    pub limit: u32,
    pub include_page_count: bool,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self { limit: DEFAULT_PAGE_LIMIT, include_page_count: true }
    }
}

/// Defaults for cursor-based pagination.
#[derive(Clone)]
pub struct CursorConfig {
    pub limit: u32,
    pub codec: Arc<dyn CursorCodec>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { limit: DEFAULT_CURSOR_LIMIT, codec: Arc::new(PlainCursor) }
    }
}

impl fmt::Debug for CursorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorConfig")
            .field("limit", &self.limit)
            .field("codec", &self.codec.name())
            .finish()
    }
}

/// Registration-time defaults. Immutable once a [`crate::Paginated`] is built.
#[derive(Debug, Clone, Default)]
pub struct PaginationConfig {
    pub pages: PagesConfig,
    pub cursor: CursorConfig,
}

impl PaginationConfig {
    #[must_use]
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.pages.limit = limit.max(1);
        self
    }

    #[must_use]
    pub const fn include_page_count(mut self, include: bool) -> Self {
        self.pages.include_page_count = include;
        self
    }

    #[must_use]
    pub fn cursor_limit(mut self, limit: u32) -> Self {
        self.cursor.limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn cursor_codec(mut self, codec: impl CursorCodec + 'static) -> Self {
        self.cursor.codec = Arc::new(codec);
        self
    }
}

impl From<&PaginationSection> for PaginationConfig {
    fn from(section: &PaginationSection) -> Self {
        let config = Self::default()
            .page_limit(section.page_limit)
            .include_page_count(section.include_page_count)
            .cursor_limit(section.cursor_limit);
        match section.cursor_encoding {
            CursorEncoding::Plain => config.cursor_codec(PlainCursor),
            CursorEncoding::Base64 => config.cursor_codec(Base64Cursor),
        }
    }
}
