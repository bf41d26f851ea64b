//! Pagination extension for kaname models.
//!
//! Wraps any [`Paginate`] model in a [`Paginated`] value that adds two query
//! entry points on top of the model's own API:
//!
//! - [`Paginated::with_pages`]: offset pagination with an optional count query.
//! - [`Paginated::with_cursor`]: keyset pagination over a sortable, unique column.
//!
//! Defaults live in an immutable [`PaginationConfig`] supplied once when the
//! wrapper is built; [`PageRequest`] and [`CursorRequest`] carry per-call overrides.

mod codec;
mod config;
mod error;
mod model;
mod paginator;
mod request;
mod result;

pub use codec::{Base64Cursor, CursorCodec, CursorKind, CursorValue, PlainCursor};
pub use config::{CursorConfig, PagesConfig, PaginationConfig};
pub use error::{CursorDecodeError, PaginationError};
pub use model::Paginate;
pub use paginator::{PaginateExt, Paginated};
pub use request::{CursorRequest, PageRequest, ResolvedCursor, ResolvedPage};
pub use result::{CursorResult, PageMeta, PageResult};
