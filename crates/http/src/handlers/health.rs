use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kaname_service::HealthReport;

use crate::AppState;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn readiness(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.container.health.readiness().await;
    let status = if report.database_ok { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(report))
}
