//! In-process router tests.
//!
//! These exercise the HTTP surface up to (but not including) the database:
//! routing, request validation, and the error payload shape. The pool is
//! created lazily so no database is needed.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use library_api::{
    api,
    config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    repository::Repository,
    services::Services,
    AppState,
};

fn test_app() -> Router {
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        logging: LoggingConfig::default(),
    };

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("Failed to create lazy pool");

    let repository = Repository::new(pool);
    let services = Services::new(repository);

    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn create_book_with_empty_body_yields_three_field_errors() {
    let app = test_app();

    let response = app
        .oneshot(json_request("POST", "/api/books", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], "author must not be empty");
    assert_eq!(errors[1], "isbn must not be empty");
    assert_eq!(errors[2], "title must not be empty");
}

#[tokio::test]
async fn create_book_with_blank_fields_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/books",
            json!({"title": "", "author": "Artur", "isbn": "001"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"], json!(["title must not be empty"]));
}

#[tokio::test]
async fn create_loan_with_empty_body_yields_two_field_errors() {
    let app = test_app();

    let response = app
        .oneshot(json_request("POST", "/api/loans", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], "customer must not be empty");
    assert_eq!(errors[1], "isbn must not be empty");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/books")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/shelves")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
