use kaname_core::{NewUser, User, UserFilter};
use kaname_pagination::{
    CursorRequest, CursorResult, PageRequest, PageResult, Paginated, PaginationConfig,
};
use kaname_storage::{StorageBackend, UserStore as _, Users};
use validator::Validate as _;

use crate::error::ServiceError;

/// User use cases: listing (page or cursor), lookup and creation.
#[derive(Debug)]
pub struct UserService {
    users: Paginated<Users<StorageBackend>>,
}

impl UserService {
    pub fn new(storage: StorageBackend, pagination: PaginationConfig) -> Self {
        Self { users: Paginated::new(Users(storage), pagination) }
    }

    pub fn pagination(&self) -> &PaginationConfig {
        self.users.config()
    }

    pub async fn list_users(
        &self,
        search: Option<&str>,
        request: &PageRequest,
    ) -> Result<PageResult<User>, ServiceError> {
        let filter = UserFilter::search(search);
        Ok(self.users.with_pages(&filter, request).await?)
    }

    pub async fn list_users_by_cursor(
        &self,
        search: Option<&str>,
        request: &CursorRequest,
    ) -> Result<CursorResult<User>, ServiceError> {
        let filter = UserFilter::search(search);
        Ok(self.users.with_cursor(&filter, request).await?)
    }

    pub async fn count_users(&self, search: Option<&str>) -> Result<u64, ServiceError> {
        Ok(self.users.store().count_users(&UserFilter::search(search)).await?)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        self.users
            .store()
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound { entity: "user", id: id.to_string() })
    }

    /// Validates, normalizes and stores a new user.
    pub async fn create_user(&self, input: NewUser) -> Result<User, ServiceError> {
        let input = input.normalized();
        input.validate()?;
        let user = self.users.store().create_user(&input).await?;
        tracing::info!(id = user.id, "user created");
        Ok(user)
    }
}
