//! Request/query types (Deserialize)

use kaname_core::MAX_PAGE_LIMIT;
use kaname_pagination::{CursorRequest, PageRequest};
use serde::Deserialize;

/// `GET /users` query string.
///
/// `page` and `limit` stay raw text so junk values fall back to defaults
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub cursor: Option<String>,
    /// `cursor` selects keyset pagination even without a cursor.
    pub mode: Option<String>,
    pub column: Option<String>,
}

impl ListUsersQuery {
    pub fn is_cursor_mode(&self) -> bool {
        self.cursor.is_some() || self.mode.as_deref() == Some("cursor")
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
            .cap_limit(u64::from(MAX_PAGE_LIMIT))
    }

    pub fn cursor_request(&self) -> CursorRequest {
        let request = CursorRequest::from_raw(self.cursor.as_deref(), self.limit.as_deref())
            .cap_limit(u64::from(MAX_PAGE_LIMIT));
        match self.column.as_deref() {
            Some(column) => request.column(column),
            None => request,
        }
    }
}
