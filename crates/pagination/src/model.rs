use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::{CursorKind, CursorValue};

/// A queryable model that [`crate::Paginated`] can page through.
///
/// Implementors supply three primitive queries; the wrapper owns offset
/// arithmetic, probe rows, counting policy and cursor encoding.
#[async_trait]
pub trait Paginate: Send + Sync {
    type Item: Send;
    type Filter: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Type of `column` if it can back a cursor, `None` otherwise.
    ///
    /// Only sortable columns with unique values should be reported here.
    fn cursor_kind(&self, column: &str) -> Option<CursorKind>;

    /// Reads `column` from a row returned by [`Self::fetch_after`].
    fn cursor_value(&self, item: &Self::Item, column: &str) -> Option<CursorValue>;

    /// Rows matching `filter` in the model's natural order, skipping `offset`.
    async fn fetch_window(
        &self,
        filter: &Self::Filter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Item>, Self::Error>;

    /// Number of rows matching `filter`, ignoring any window.
    async fn count(&self, filter: &Self::Filter) -> Result<u64, Self::Error>;

    /// Rows matching `filter` ordered ascending by `column`, strictly after `after`.
    async fn fetch_after(
        &self,
        filter: &Self::Filter,
        column: &str,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<Self::Item>, Self::Error>;
}

#[async_trait]
impl<M: Paginate + ?Sized> Paginate for Arc<M> {
    type Item = M::Item;
    type Filter = M::Filter;
    type Error = M::Error;

    fn cursor_kind(&self, column: &str) -> Option<CursorKind> {
        (**self).cursor_kind(column)
    }

    fn cursor_value(&self, item: &Self::Item, column: &str) -> Option<CursorValue> {
        (**self).cursor_value(item, column)
    }

    async fn fetch_window(
        &self,
        filter: &Self::Filter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch_window(filter, offset, limit).await
    }

    async fn count(&self, filter: &Self::Filter) -> Result<u64, Self::Error> {
        (**self).count(filter).await
    }

    async fn fetch_after(
        &self,
        filter: &Self::Filter,
        column: &str,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch_after(filter, column, after, limit).await
    }
}
