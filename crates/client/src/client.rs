use kaname_core::{NewUser, ProblemDetails, User};
use kaname_pagination::{CursorResult, PageResult};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::params::{CursorParams, ListUsersParams};

/// Client for the users API.
pub struct KanameClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for KanameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KanameClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl KanameClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url, token: None })
    }

    /// Sends `Authorization: Bearer <token>` on write requests.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let response = check(self.client.get(self.url("/health")).send().await?).await?;
        Ok(response.text().await?)
    }

    pub async fn list_users(&self, params: &ListUsersParams) -> Result<PageResult<User>, ClientError> {
        self.get_json(self.client.get(self.url("/users")).query(params)).await
    }

    pub async fn users_by_cursor(&self, params: &CursorParams) -> Result<CursorResult<User>, ClientError> {
        self.get_json(self.client.get(self.url("/users")).query(params)).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ClientError> {
        self.get_json(self.client.get(self.url(&format!("/users/{id}")))).await
    }

    pub async fn create_user(&self, input: &NewUser) -> Result<User, ClientError> {
        let mut request = self.client.post(self.url("/users")).json(input);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        self.get_json(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turns non-2xx responses into errors, decoding problem details when present.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    tracing::debug!(status = status.as_u16(), "API request failed");
    match serde_json::from_str::<ProblemDetails>(&body) {
        Ok(problem) => Err(ClientError::Api(problem)),
        Err(_) => Err(ClientError::Status { code: status.as_u16(), body }),
    }
}
