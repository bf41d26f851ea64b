use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kaname_core::{NewUser, User};
use kaname_pagination::{CursorResult, PageResult};
use serde::Serialize;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::ListUsersQuery;

/// Either listing shape, depending on the pagination mode requested.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UserListing {
    Pages(PageResult<User>),
    Cursor(CursorResult<User>),
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<UserListing>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let users = &state.container.users;
    let search = query.search.as_deref();
    let listing = if query.is_cursor_mode() {
        UserListing::Cursor(users.list_users_by_cursor(search, &query.cursor_request()).await?)
    } else {
        UserListing::Pages(users.list_users(search, &query.page_request()).await?)
    };
    Ok(Json(listing))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.container.users.get_user(id).await?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let user = state.container.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
