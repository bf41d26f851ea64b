//! Pagination adapter for user stores.

use async_trait::async_trait;
use kaname_core::{User, UserFilter};
use kaname_pagination::{CursorKind, CursorValue, Paginate};

use crate::error::StorageError;
use crate::traits::{UserCursorColumn, UserStore};

/// The `users` model of a store, ready to be wrapped by `Paginated`.
#[derive(Debug, Clone)]
pub struct Users<S>(pub S);

impl<S> Users<S> {
    pub const fn store(&self) -> &S {
        &self.0
    }
}

#[async_trait]
impl<S: UserStore> Paginate for Users<S> {
    type Item = User;
    type Filter = UserFilter;
    type Error = StorageError;

    fn cursor_kind(&self, column: &str) -> Option<CursorKind> {
        UserCursorColumn::parse(column).map(UserCursorColumn::kind)
    }

    fn cursor_value(&self, item: &User, column: &str) -> Option<CursorValue> {
        UserCursorColumn::parse(column).map(|c| c.value_of(item))
    }

    async fn fetch_window(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        self.0.list_users(filter, offset, limit).await
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, StorageError> {
        self.0.count_users(filter).await
    }

    async fn fetch_after(
        &self,
        filter: &UserFilter,
        column: &str,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        let column = UserCursorColumn::parse(column)
            .ok_or_else(|| StorageError::UnsupportedColumn(column.to_owned()))?;
        self.0.list_users_after(filter, column, after, limit).await
    }
}
