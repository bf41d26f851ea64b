//! Storage backend trait abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use kaname_core::{NewUser, User, UserFilter};
use kaname_pagination::{CursorKind, CursorValue};

use crate::error::StorageError;

/// Columns of `users` that can back a cursor: sortable and unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCursorColumn {
    Id,
    Email,
}

impl UserCursorColumn {
    pub fn parse(column: &str) -> Option<Self> {
        match column {
            "id" => Some(Self::Id),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// Column name; only ever one of a fixed set, safe to splice into SQL.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
        }
    }

    pub const fn kind(self) -> CursorKind {
        match self {
            Self::Id => CursorKind::Int,
            Self::Email => CursorKind::Text,
        }
    }

    pub fn value_of(self, user: &User) -> CursorValue {
        match self {
            Self::Id => CursorValue::Int(user.id),
            Self::Email => CursorValue::Text(user.email.clone()),
        }
    }

    /// Rejects a decoded position whose type does not match the column.
    pub(crate) fn check(self, after: Option<&CursorValue>) -> Result<(), StorageError> {
        match after {
            Some(value) if value.kind() != self.kind() => Err(StorageError::UnsupportedColumn(
                format!("{} cannot be compared with {value:?}", self.as_sql()),
            )),
            _ => Ok(()),
        }
    }
}

/// User persistence.
///
/// Listing order is ascending `id`; `list_users` and `count_users` apply the
/// same filter so a page and its total always describe the same row set.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email returns [`StorageError::Duplicate`].
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn count_users(&self, filter: &UserFilter) -> Result<u64, StorageError>;

    async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError>;

    /// Users ordered ascending by `column`, strictly after `after`.
    async fn list_users_after(
        &self,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError>;

    /// Cheap round-trip to verify the backend is reachable.
    async fn ping(&self) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        (**self).create_user(user).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        (**self).get_user(id).await
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64, StorageError> {
        (**self).count_users(filter).await
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        (**self).list_users(filter, offset, limit).await
    }

    async fn list_users_after(
        &self,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        (**self).list_users_after(filter, column, after, limit).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        (**self).ping().await
    }
}
