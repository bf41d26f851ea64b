//! HTTP API server for kaname.

#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
pub mod auth;
mod handlers;
mod query_types;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use kaname_service::Container;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use auth::{Claims, JwtAuth};

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for sharing across handlers.
pub struct AppState {
    /// Services resolved by the controllers
    pub container: Container,
    /// Bearer-token verifier; `None` disables authentication
    pub auth: Option<JwtAuth>,
}

impl AppState {
    /// State with authentication configured from `auth.jwt_secret`.
    pub fn new(container: Container) -> Self {
        let auth = container
            .config
            .auth
            .jwt_secret
            .as_deref()
            .map(|secret| JwtAuth::hs256(secret, container.config.auth.leeway_secs));
        if auth.is_none() {
            tracing::warn!("auth.jwt_secret not set, write endpoints are unauthenticated");
        }
        Self { container, auth }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let require_auth = middleware::from_fn_with_state(Arc::clone(&state), auth::require_auth);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
        .route(
            "/users",
            get(handlers::users::list_users)
                .merge(post(handlers::users::create_user).route_layer(require_auth)),
        )
        .route("/users/{id}", get(handlers::users::get_user))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host:port` and serves until ctrl-c.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
