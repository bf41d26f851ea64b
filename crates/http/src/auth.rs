//! JWT bearer authentication middleware.
//!
//! Verification is delegated to `jsonwebtoken`. On failure the verifier's
//! error text is sent back unchanged as the 401 body.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AppState;

/// Claims carried by an accepted token; inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// HS256 token verifier.
pub struct JwtAuth {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn hs256(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    pub fn verify(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let value = headers.get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedHeader)?;
        Ok(decode::<Claims>(token, &self.key, &self.validation)?.claims)
    }
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth) = state.auth.as_ref() else {
        return next.run(request).await;
    };
    match auth.verify(request.headers()) {
        Ok(claims) => {
            tracing::debug!(sub = %claims.sub, "request authenticated");
            request.extensions_mut().insert(claims);
            next.run(request).await
        },
        Err(err) => {
            tracing::debug!(error = %err, "rejecting unauthenticated request");
            (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, "Bearer")], err.to_string())
                .into_response()
        },
    }
}
