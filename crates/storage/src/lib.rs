//! Storage layer for kaname.
//!
//! A `users` table on `SQLite` (rusqlite + r2d2, blocking calls moved onto
//! the blocking pool) or `PostgreSQL` (sqlx), unified behind [`StorageBackend`].
//! [`Users`] adapts any [`UserStore`] to the pagination extension.

mod backend;
pub mod error;
mod model;
#[cfg(feature = "postgres")]
mod pg_migrations;
#[cfg(feature = "postgres")]
mod pg_storage;
#[cfg(feature = "sqlite")]
mod sqlite_migrations;
#[cfg(feature = "sqlite")]
mod sqlite_storage;
#[cfg(all(test, feature = "sqlite"))]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use model::Users;
#[cfg(feature = "postgres")]
pub use pg_storage::PgStorage;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;
pub use traits::{UserCursorColumn, UserStore};
