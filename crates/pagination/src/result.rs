use serde::{Deserialize, Serialize};

/// Navigation metadata for a page-based result.
///
/// `last_page` and `total` are only present when the count query ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub per_page: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub previous_page: Option<u64>,
    pub next_page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult { data: self.data.into_iter().map(f).collect(), meta: self.meta }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorResult<T> {
    pub data: Vec<T>,
    /// `None` exactly when this window is the last one.
    pub next_cursor: Option<String>,
}

impl<T> CursorResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorResult<U> {
        CursorResult { data: self.data.into_iter().map(f).collect(), next_cursor: self.next_cursor }
    }

    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
