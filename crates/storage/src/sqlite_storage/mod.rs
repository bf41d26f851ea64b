//! `SQLite` storage implementation.
//!
//! Queries are synchronous rusqlite calls; the async [`crate::UserStore`]
//! impl moves each one onto the blocking thread pool.

mod users;

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

use crate::error::StorageError;
use crate::sqlite_migrations;

/// `SQLite` storage wrapping an r2d2 connection pool.
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pub(crate) pool: Pool<SqliteConnectionManager>,
}

/// Unicode-aware `LOWER`; the builtin only folds ASCII.
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";

fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 30000;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get_raw(0).as_str().ok().map(str::to_lowercase)),
    )?;
    Ok(())
}

impl SqliteStorage {
    /// Opens (creating if needed) the database at `db_path` and migrates it.
    pub fn new(db_path: &Path, pool_size: u32) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Pool(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(init_connection);
        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;

        let conn = pool.get()?;
        sqlite_migrations::run_migrations(&conn)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        drop(conn);

        tracing::info!(path = %db_path.display(), pool_size, "SQLite storage initialized");
        Ok(Self { pool })
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await?
    }
}
