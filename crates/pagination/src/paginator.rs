use std::ops::Deref;
use std::sync::Arc;

use crate::config::PaginationConfig;
use crate::error::PaginationError;
use crate::model::Paginate;
use crate::request::{CursorRequest, PageRequest};
use crate::result::{CursorResult, PageMeta, PageResult};

/// A model extended with `with_pages` and `with_cursor`.
///
/// Derefs to the wrapped model so its own methods stay reachable.
#[derive(Debug, Clone)]
pub struct Paginated<M> {
    model: M,
    config: Arc<PaginationConfig>,
}

impl<M> Deref for Paginated<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<M: Paginate> Paginated<M> {
    pub fn new(model: M, config: PaginationConfig) -> Self {
        Self { model, config: Arc::new(config) }
    }

    /// Wraps `model` with defaults shared across several wrappers.
    pub const fn with_shared_config(model: M, config: Arc<PaginationConfig>) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn into_inner(self) -> M {
        self.model
    }

    /// Offset pagination.
    ///
    /// Fetches the window first, then (when counting) the total under the same
    /// filter. The two queries are not wrapped in a transaction. Without a
    /// count, one probe row past the window decides `next_page`.
    pub async fn with_pages(
        &self,
        filter: &M::Filter,
        request: &PageRequest,
    ) -> Result<PageResult<M::Item>, PaginationError<M::Error>> {
        let page = request.resolve(&self.config.pages);
        tracing::debug!(
            page = page.page,
            limit = page.limit,
            include_count = page.include_count,
            "paginating by page"
        );

        let (data, total, has_more) = if page.include_count {
            let data = self
                .model
                .fetch_window(filter, page.offset, page.limit)
                .await
                .map_err(PaginationError::Query)?;
            let total = self.model.count(filter).await.map_err(PaginationError::Query)?;
            let last_page = total.div_ceil(page.limit);
            (data, Some(total), page.page < last_page)
        } else {
            let mut data = self
                .model
                .fetch_window(filter, page.offset, page.limit.saturating_add(1))
                .await
                .map_err(PaginationError::Query)?;
            let has_more = truncate_probe(&mut data, page.limit);
            (data, None, has_more)
        };

        let meta = PageMeta {
            current_page: page.page,
            last_page: total.map(|t| t.div_ceil(page.limit)),
            total,
            per_page: page.limit,
            is_first_page: page.page == 1,
            is_last_page: !has_more,
            previous_page: (page.page > 1).then(|| page.page - 1),
            next_page: has_more.then(|| page.page.saturating_add(1)),
        };
        Ok(PageResult { data, meta })
    }

    /// Keyset pagination over `request`'s cursor column.
    ///
    /// `next_cursor` encodes the last returned row, so the following call
    /// resumes strictly after it.
    pub async fn with_cursor(
        &self,
        filter: &M::Filter,
        request: &CursorRequest,
    ) -> Result<CursorResult<M::Item>, PaginationError<M::Error>> {
        let resolved = request.resolve(&self.config.cursor);
        let kind = self
            .model
            .cursor_kind(&resolved.column)
            .ok_or_else(|| PaginationError::UnknownCursorColumn(resolved.column.clone()))?;

        let after = match resolved.cursor.as_deref() {
            Some(cursor) => Some(resolved.codec.decode(cursor, kind).map_err(|source| {
                tracing::debug!(cursor, error = %source, "rejecting cursor");
                PaginationError::InvalidCursor { cursor: cursor.to_owned(), source }
            })?),
            None => None,
        };
        tracing::debug!(column = %resolved.column, limit = resolved.limit, after = ?after, "paginating by cursor");

        let mut data = self
            .model
            .fetch_after(filter, &resolved.column, after.as_ref(), resolved.limit.saturating_add(1))
            .await
            .map_err(PaginationError::Query)?;

        let next_cursor = if truncate_probe(&mut data, resolved.limit) {
            let last = data.last().and_then(|item| self.model.cursor_value(item, &resolved.column));
            match last {
                Some(value) => Some(resolved.codec.encode(&value)),
                None => return Err(PaginationError::MissingCursorValue(resolved.column)),
            }
        } else {
            None
        };
        Ok(CursorResult { data, next_cursor })
    }
}

/// Drops the probe row if present; returns whether it was there.
fn truncate_probe<T>(data: &mut Vec<T>, limit: u64) -> bool {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let has_more = data.len() > limit;
    data.truncate(limit);
    has_more
}

/// Builds a [`Paginated`] wrapper around any model.
pub trait PaginateExt: Paginate + Sized {
    fn paginate(self, config: PaginationConfig) -> Paginated<Self> {
        Paginated::new(self, config)
    }
}

impl<M: Paginate> PaginateExt for M {}
