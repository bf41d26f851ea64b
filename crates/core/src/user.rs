//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(range(min = 0, max = 150, message = "age must be between 0 and 150"))]
    pub age: i32,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self { name: name.into(), email: email.into(), age }
    }

    /// Trims the name and lowercases the email so uniqueness is case-insensitive.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_lowercase(),
            age: self.age,
        }
    }
}

/// Filter criteria shared by the data and count queries of a user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
}

impl UserFilter {
    /// Builds a filter, treating blank search terms as no filter.
    pub fn search(term: Option<&str>) -> Self {
        let search = term.map(str::trim).filter(|t| !t.is_empty()).map(ToOwned::to_owned);
        Self { search }
    }

    /// The search term wrapped for a `LIKE ... ESCAPE '\'` clause.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|s| format!("%{}%", escape_like(&s.to_lowercase())))
    }
}

/// Escape LIKE metacharacters so user input matches literally.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
