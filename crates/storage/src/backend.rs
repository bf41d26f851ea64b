//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use kaname_core::{DatabaseSection, NewUser, User, UserFilter};
use kaname_pagination::CursorValue;

use crate::error::StorageError;
use crate::traits::{UserCursorColumn, UserStore};

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite(s) => <crate::SqliteStorage as UserStore>::$method(s, $($arg),*).await,
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres(s) => <crate::PgStorage as UserStore>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    #[cfg(feature = "sqlite")]
    Sqlite(crate::SqliteStorage),
    #[cfg(feature = "postgres")]
    Postgres(crate::PgStorage),
}

impl StorageBackend {
    /// Connects to `PostgreSQL` when `database.url` is set, otherwise `SQLite`.
    pub async fn connect(database: &DatabaseSection) -> Result<Self, StorageError> {
        if let Some(url) = database.url.as_deref() {
            return Self::connect_postgres(url, database.pool_size).await;
        }
        Self::connect_sqlite(database)
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(url: &str, pool_size: u32) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::PgStorage::new(url, pool_size).await?))
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(_url: &str, _pool_size: u32) -> Result<Self, StorageError> {
        Err(StorageError::Pool("built without the `postgres` feature".into()))
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(database: &DatabaseSection) -> Result<Self, StorageError> {
        let path = database.sqlite_path_or_default();
        Ok(Self::Sqlite(crate::SqliteStorage::new(&path, database.pool_size)?))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_database: &DatabaseSection) -> Result<Self, StorageError> {
        Err(StorageError::Pool("no database.url set and built without the `sqlite` feature".into()))
    }

    /// Backend name for logs and diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

#[async_trait]
impl UserStore for StorageBackend {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        dispatch!(self, create_user(user))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        dispatch!(self, get_user(id))
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64, StorageError> {
        dispatch!(self, count_users(filter))
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        dispatch!(self, list_users(filter, offset, limit))
    }

    async fn list_users_after(
        &self,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        dispatch!(self, list_users_after(filter, column, after, limit))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        dispatch!(self, ping())
    }
}
