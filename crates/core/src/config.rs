//! Layered application configuration.
//!
//! Built-in defaults, then one TOML file per section from the config
//! directory (`app.toml`, `database.toml`, `auth.toml`, `pagination.toml`),
//! then environment variable overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DB_POOL_MAX_CONNECTIONS, DEFAULT_CONFIG_DIR, DEFAULT_CURSOR_LIMIT, DEFAULT_HOST,
    DEFAULT_PAGE_LIMIT, DEFAULT_PORT,
};
use crate::env_config::env_parse_with_default;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub database: DatabaseSection,
    pub auth: AuthSection,
    pub pagination: PaginationSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppSection {
    fn default() -> Self {
        Self { name: "kaname".to_owned(), host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// `PostgreSQL` connection string. Takes precedence over `sqlite_path`.
    pub url: Option<String>,
    pub sqlite_path: Option<PathBuf>,
    pub pool_size: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self { url: None, sqlite_path: None, pool_size: DB_POOL_MAX_CONNECTIONS }
    }
}

impl DatabaseSection {
    /// Configured `SQLite` path, or `<data dir>/kaname/kaname.db`.
    pub fn sqlite_path_or_default(&self) -> PathBuf {
        self.sqlite_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("kaname")
                .join("kaname.db")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// HS256 secret. Authentication is disabled when unset.
    pub jwt_secret: Option<String>,
    pub leeway_secs: u64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self { jwt_secret: None, leeway_secs: 60 }
    }
}

/// How cursors are rendered on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorEncoding {
    #[default]
    Plain,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSection {
    pub page_limit: u32,
    pub include_page_count: bool,
    pub cursor_limit: u32,
    pub cursor_encoding: CursorEncoding,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            include_page_count: true,
            cursor_limit: DEFAULT_CURSOR_LIMIT,
            cursor_encoding: CursorEncoding::Plain,
        }
    }
}

impl AppConfig {
    /// Config directory from `KANAME_CONFIG_DIR`, falling back to `./config`.
    pub fn default_dir() -> PathBuf {
        std::env::var("KANAME_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR))
    }

    /// Loads defaults, the TOML files in `dir` and then env overrides.
    ///
    /// A missing directory is not an error; the defaults apply.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_dir(dir)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Loads defaults plus the TOML files in `dir`, without env overrides.
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let modules = read_config_modules(dir)?;
        let mut root = toml::Table::new();
        for (name, table) in modules {
            root.insert(name, toml::Value::Table(table));
        }
        toml::Value::Table(root).try_into().map_err(|e: toml::de::Error| {
            ConfigError::Invalid(format!("{}: {}", dir.display(), e.message()))
        })
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("KANAME_HOST") {
            self.app.host = host;
        }
        self.app.port = env_parse_with_default("KANAME_PORT", self.app.port);
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Ok(path) = std::env::var("KANAME_SQLITE_PATH") {
            self.database.sqlite_path = Some(PathBuf::from(path));
        }
        self.database.pool_size =
            env_parse_with_default("KANAME_DB_POOL_SIZE", self.database.pool_size);
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        self.pagination.page_limit =
            env_parse_with_default("KANAME_PAGE_LIMIT", self.pagination.page_limit);
        self.pagination.cursor_limit =
            env_parse_with_default("KANAME_CURSOR_LIMIT", self.pagination.cursor_limit);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.page_limit == 0 {
            return Err(ConfigError::Invalid("pagination.page_limit must be at least 1".into()));
        }
        if self.pagination.cursor_limit == 0 {
            return Err(ConfigError::Invalid("pagination.cursor_limit must be at least 1".into()));
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::Invalid("database.pool_size must be at least 1".into()));
        }
        if self.auth.jwt_secret.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        Ok(())
    }
}

/// Reads every `*.toml` file in `dir`, keyed by file stem, sorted by name.
///
/// Shared with the config-types generator so both see the same modules.
pub fn read_config_modules(dir: &Path) -> Result<Vec<(String, toml::Table)>, ConfigError> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "config directory missing, using defaults");
        return Ok(Vec::new());
    }
    let entries =
        fs::read_dir(dir).map_err(|source| ConfigError::Read { path: dir.to_owned(), source })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| ConfigError::Read { path: dir.to_owned(), source })?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut modules = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(ToOwned::to_owned) else {
            continue;
        };
        let raw = fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let table: toml::Table =
            raw.parse().map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        modules.push((stem, table));
    }
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_yields_defaults() {
        let config = AppConfig::from_dir(Path::new("/nonexistent/kaname/config")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pagination.page_limit, 10);
        assert!(config.pagination.include_page_count);
    }

    #[test]
    fn test_sections_are_read_per_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.toml"), "port = 8080\nname = \"demo\"\n").unwrap();
        fs::write(
            dir.path().join("pagination.toml"),
            "page_limit = 25\ninclude_page_count = false\ncursor_encoding = \"base64\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let config = AppConfig::from_dir(dir.path()).unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.name, "demo");
        assert_eq!(config.app.host, DEFAULT_HOST);
        assert_eq!(config.pagination.page_limit, 25);
        assert!(!config.pagination.include_page_count);
        assert_eq!(config.pagination.cursor_encoding, CursorEncoding::Base64);
        assert_eq!(config.pagination.cursor_limit, DEFAULT_CURSOR_LIMIT);
    }

    #[test]
    fn test_unknown_modules_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mail.toml"), "driver = \"smtp\"\n").unwrap();
        let config = AppConfig::from_dir(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.toml"), "port = \n").unwrap();
        let err = AppConfig::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.toml"), "port = \"eighty\"\n").unwrap();
        let err = AppConfig::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_page_limit_fails_validation() {
        let mut config = AppConfig::default();
        config.pagination.page_limit = 0;
        assert!(config.validate().is_err());
    }
}
