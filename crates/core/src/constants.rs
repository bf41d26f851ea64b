//! Shared constants for kaname.

/// Default page size for page-based pagination.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Default page size for cursor-based pagination.
pub const DEFAULT_CURSOR_LIMIT: u32 = 10;

/// Upper bound applied to caller-supplied limits at the HTTP edge (DoS protection).
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Column used for cursor pagination when the caller does not name one.
pub const DEFAULT_CURSOR_COLUMN: &str = "id";

/// Default HTTP bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Connection pool: maximum connections (`PostgreSQL`) / pool size (`SQLite`).
pub const DB_POOL_MAX_CONNECTIONS: u32 = 10;

/// `PostgreSQL` connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// `PostgreSQL` connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Maximum length of a user's name.
pub const MAX_USER_NAME_LEN: u64 = 255;

/// Maximum accepted user age.
pub const MAX_USER_AGE: i32 = 150;
