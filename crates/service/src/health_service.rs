use kaname_storage::{StorageBackend, UserStore as _};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub database: &'static str,
    pub database_ok: bool,
}

/// Liveness and readiness checks.
#[derive(Debug)]
pub struct HealthService {
    storage: StorageBackend,
}

impl HealthService {
    pub const fn new(storage: StorageBackend) -> Self {
        Self { storage }
    }

    /// Pings the database; a failure degrades the report instead of erroring.
    pub async fn readiness(&self) -> HealthReport {
        let database_ok = match self.storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "database ping failed");
                false
            },
        };
        HealthReport {
            status: if database_ok { "ready" } else { "degraded" },
            database: self.storage.kind(),
            database_ok,
        }
    }
}
