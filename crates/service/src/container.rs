//! Dependency container.
//!
//! Built once at startup from [`AppConfig`]; the HTTP server and console
//! commands resolve their services from it.

use std::sync::Arc;

use kaname_core::AppConfig;
use kaname_pagination::PaginationConfig;
use kaname_storage::StorageBackend;

use crate::error::ServiceError;
use crate::health_service::HealthService;
use crate::user_service::UserService;

#[derive(Debug, Clone)]
pub struct Container {
    pub config: Arc<AppConfig>,
    pub storage: StorageBackend,
    pub users: Arc<UserService>,
    pub health: Arc<HealthService>,
}

impl Container {
    /// Connects storage (running migrations) and builds every service.
    pub async fn build(config: AppConfig) -> Result<Self, ServiceError> {
        let storage = StorageBackend::connect(&config.database).await?;
        tracing::info!(backend = storage.kind(), "storage connected");
        Ok(Self::from_parts(config, storage))
    }

    pub fn from_parts(config: AppConfig, storage: StorageBackend) -> Self {
        let pagination = PaginationConfig::from(&config.pagination);
        Self {
            users: Arc::new(UserService::new(storage.clone(), pagination)),
            health: Arc::new(HealthService::new(storage.clone())),
            storage,
            config: Arc::new(config),
        }
    }
}
