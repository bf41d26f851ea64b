use serde::Serialize;

/// Query for `GET /users` in page mode.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListUsersParams {
    #[must_use]
    pub fn page(page: u64, limit: u64) -> Self {
        Self { page: Some(page), limit: Some(limit), search: None }
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Query for `GET /users` in cursor mode.
#[derive(Debug, Clone, Serialize)]
pub struct CursorParams {
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for CursorParams {
    fn default() -> Self {
        Self { mode: "cursor", cursor: None, limit: None, column: None, search: None }
    }
}

impl CursorParams {
    /// Page following `cursor`, as returned in a previous `nextCursor`.
    #[must_use]
    pub fn after(cursor: impl Into<String>) -> Self {
        Self { cursor: Some(cursor.into()), ..Self::default() }
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}
