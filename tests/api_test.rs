use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_backend::api::router;
use todo_backend::db::Store;
use todo_backend::state::AppState;

async fn setup_app() -> Router {
    let store = Store::in_memory().await.expect("Failed to create store");
    router(AppState { store })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("Body is not JSON")
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = setup_app().await;

    let (status, body) = send(&app, Method::POST, "/api/todos", Some(json!({"title": "Buy milk"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        json_body(&body),
        json!({"id": 1, "title": "Buy milk", "description": null, "is_done": false})
    );

    let (status, body) = send(&app, Method::PUT, "/api/todos/1", Some(json!({"is_done": true}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!({"id": 1, "title": "Buy milk", "description": null, "is_done": true})
    );

    let (status, body) = send(&app, Method::DELETE, "/api/todos/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_created_todo_is_listed() {
    let app = setup_app().await;

    send(&app, Method::POST, "/api/todos", Some(json!({"title": "Buy milk", "description": "two litres"}))).await;
    send(&app, Method::POST, "/api/todos", Some(json!({"title": "Walk dog"}))).await;

    let (status, body) = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    let todos = json_body(&body);
    let todos = todos.as_array().expect("Expected an array");
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["title"], "Buy milk");
    assert_eq!(todos[0]["description"], "two litres");
    assert_eq!(todos[1]["title"], "Walk dog");
}

#[tokio::test]
async fn test_get_missing_todo_returns_null() {
    let app = setup_app().await;

    let (status, body) = send(&app, Method::GET, "/api/todos/99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), Value::Null);
}

#[tokio::test]
async fn test_full_record_overwrite_ignores_id() {
    let app = setup_app().await;
    send(&app, Method::POST, "/api/todos", Some(json!({"title": "Buy milk", "description": "two litres"}))).await;

    let overwrite = json!({"id": 1, "title": "Buy oat milk", "description": null, "is_done": true});
    let (status, _) = send(&app, Method::PUT, "/api/todos/1", Some(overwrite)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/todos/1", None).await;
    assert_eq!(
        json_body(&body),
        json!({"id": 1, "title": "Buy oat milk", "description": null, "is_done": true})
    );
}

#[tokio::test]
async fn test_update_and_delete_missing_todo() {
    let app = setup_app().await;

    let (status, body) = send(&app, Method::PUT, "/api/todos/5", Some(json!({"is_done": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["message"], "Not Found");

    let (status, _) = send(&app, Method::DELETE, "/api/todos/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_without_title_is_rejected() {
    let app = setup_app().await;

    let (status, _) = send(&app, Method::POST, "/api/todos", Some(json!({"description": "no title"}))).await;
    assert!(status.is_client_error());

    let (_, body) = send(&app, Method::GET, "/api/todos", None).await;
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/todos")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
