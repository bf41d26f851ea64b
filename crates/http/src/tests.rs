use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use jsonwebtoken::{EncodingKey, Header, encode};
use kaname_core::{AppConfig, NewUser, PROBLEM_JSON, ProblemDetails, User};
use kaname_pagination::{CursorResult, PageResult};
use kaname_service::Container;
use kaname_storage::{SqliteStorage, StorageBackend};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, Claims, create_router};

const SECRET: &str = "test-secret";

fn test_app(config: AppConfig) -> (Router, Container, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = SqliteStorage::new(&temp_dir.path().join("http.db"), 2).unwrap();
    let container = Container::from_parts(config, StorageBackend::Sqlite(storage));
    let router = create_router(Arc::new(AppState::new(container.clone())));
    (router, container, temp_dir)
}

fn secured_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(SECRET.to_owned());
    config
}

async fn seed(container: &Container, count: usize) {
    for n in 1..=count {
        container
            .users
            .create_user(NewUser::new(format!("User {n:02}"), format!("u{n:02}@example.com"), 20))
            .await
            .unwrap();
    }
}

fn token(secret: &str, exp_offset: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims { sub: "tester".to_owned(), exp: (now + exp_offset) as u64, iat: Some(now as u64) };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

async fn get(router: Router, uri: &str) -> Response {
    router.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap()
}

async fn post_user(router: Router, body: &str, bearer: Option<&str>) -> Response {
    let mut request = Request::post("/users").header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    router.oneshot(request.body(Body::from(body.to_owned())).unwrap()).await.unwrap()
}

async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_returns_ok() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = get(router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_readiness_reports_database() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = get(router, "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: serde_json::Value = body_json(response).await;
    assert_eq!(report["database"], "sqlite");
}

#[tokio::test]
async fn test_list_users_pages() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 25).await;

    let response = get(router, "/users?page=3&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: PageResult<User> = body_json(response).await;
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.meta.current_page, 3);
    assert_eq!(page.meta.last_page, Some(3));
    assert_eq!(page.meta.total, Some(25));
    assert!(page.meta.is_last_page);
}

#[tokio::test]
async fn test_list_users_junk_params_use_defaults() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 12).await;

    let page: PageResult<User> = body_json(get(router, "/users?page=abc&limit=0").await).await;
    assert_eq!(page.meta.current_page, 1);
    assert_eq!(page.meta.per_page, 10);
    assert_eq!(page.data.len(), 10);
}

#[tokio::test]
async fn test_list_users_limit_capped() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 3).await;
    let page: PageResult<User> = body_json(get(router, "/users?limit=1000").await).await;
    assert_eq!(page.meta.per_page, 100);
}

#[tokio::test]
async fn test_list_users_search() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 12).await;
    let page: PageResult<User> = body_json(get(router, "/users?search=user%201").await).await;
    assert_eq!(page.meta.total, Some(3));
}

#[tokio::test]
async fn test_list_users_cursor_walk() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 7).await;

    let first: CursorResult<User> = body_json(get(router.clone(), "/users?mode=cursor&limit=4").await).await;
    assert_eq!(first.data.len(), 4);
    let cursor = first.next_cursor.clone().unwrap();

    let second: CursorResult<User> =
        body_json(get(router, &format!("/users?cursor={cursor}&limit=4")).await).await;
    assert_eq!(second.data.len(), 3);
    assert!(second.next_cursor.is_none());
    assert!(second.data[0].id > first.data[3].id);
}

#[tokio::test]
async fn test_cursor_exact_fit_has_no_next() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 10).await;
    let result: CursorResult<User> = body_json(get(router, "/users?mode=cursor&limit=10").await).await;
    assert_eq!(result.data.len(), 10);
    assert!(result.next_cursor.is_none());
}

#[tokio::test]
async fn test_malformed_cursor_is_bad_request() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 2).await;

    let response = get(router, "/users?cursor=not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], PROBLEM_JSON);
    let problem: ProblemDetails = body_json(response).await;
    assert_eq!(problem.status, 400);
}

#[tokio::test]
async fn test_unparseable_query_string_is_problem_details() {
    let (router, _, _dir) = test_app(AppConfig::default());

    let response = get(router, "/users?page=1&page=2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], PROBLEM_JSON);
    let problem: ProblemDetails = body_json(response).await;
    assert_eq!(problem.status, 400);
    assert!(problem.detail.unwrap_or_default().contains("page"));
}

#[tokio::test]
async fn test_unknown_cursor_column_is_bad_request() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = get(router, "/users?mode=cursor&column=age").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 1).await;

    let user: User = body_json(get(router.clone(), "/users/1").await).await;
    assert_eq!(user.email, "u01@example.com");

    let missing = get(router.clone(), "/users/99").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let bad = get(router, "/users/abc").await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_without_auth_configured() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = post_user(router, r#"{"name":"Ada","email":"ada@example.com","age":36}"#, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: User = body_json(response).await;
    assert_eq!(user.name, "Ada");
}

#[tokio::test]
async fn test_create_user_validation_failure() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = post_user(router, r#"{"name":"","email":"nope","age":200}"#, None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let problem: ProblemDetails = body_json(response).await;
    assert_eq!(problem.status, 422);
    assert!(problem.errors.contains_key("email"));
    assert!(problem.errors.contains_key("age"));
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() {
    let (router, container, _dir) = test_app(AppConfig::default());
    seed(&container, 1).await;
    let response = post_user(router, r#"{"name":"Again","email":"u01@example.com","age":5}"#, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_malformed_json() {
    let (router, _, _dir) = test_app(AppConfig::default());
    let response = post_user(router, "{not json", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_missing_token_returns_raw_error() {
    let (router, _, _dir) = test_app(secured_config());
    let response = post_user(router, r#"{"name":"Ada","email":"ada@example.com","age":36}"#, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body_text(response).await, "missing bearer token");
}

#[tokio::test]
async fn test_auth_rejects_wrong_signature() {
    let (router, _, _dir) = test_app(secured_config());
    let bad = token("other-secret", 3600);
    let response =
        post_user(router, r#"{"name":"Ada","email":"ada@example.com","age":36}"#, Some(&bad)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "InvalidSignature");
}

#[tokio::test]
async fn test_auth_rejects_expired_token() {
    let (router, _, _dir) = test_app(secured_config());
    let expired = token(SECRET, -3600);
    let response =
        post_user(router, r#"{"name":"Ada","email":"ada@example.com","age":36}"#, Some(&expired)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "ExpiredSignature");
}

#[tokio::test]
async fn test_auth_accepts_valid_token() {
    let (router, _, _dir) = test_app(secured_config());
    let valid = token(SECRET, 3600);
    let response =
        post_user(router, r#"{"name":"Ada","email":"ada@example.com","age":36}"#, Some(&valid)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_auth_leaves_reads_open() {
    let (router, _, _dir) = test_app(secured_config());
    assert_eq!(get(router, "/users").await.status(), StatusCode::OK);
}
