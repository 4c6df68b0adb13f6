use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use todo_core::{Item, ItemStore};
use todo_server::storage::{DocumentItemStore, MemoryItemStore, SqliteItemStore};
use tower::ServiceExt;

fn memory_app() -> (Router, Arc<MemoryItemStore>) {
    let store = Arc::new(MemoryItemStore::new());
    (todo_server::app(store.clone()), store)
}

async fn closed_sqlite_app() -> Router {
    let store = SqliteItemStore::open(":memory:").await.unwrap();
    store.close().await;
    todo_server::app(Arc::new(store))
}

async fn document_app() -> Router {
    let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=100")
        .await
        .unwrap();
    todo_server::app(Arc::new(DocumentItemStore::with_client(
        client,
        "todo",
        "todo_items",
    )))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// --- create ---

#[tokio::test]
async fn create_item_returns_201() {
    let (app, _) = memory_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/todo",
            r#"{"Description":"A","Completed":false}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"Id": "1", "Description": "A", "Completed": false}));
}

#[tokio::test]
async fn create_twice_creates_two_items() {
    let (app, store) = memory_app();
    let body = r#"{"Description":"same","Completed":true}"#;

    for expected_id in ["1", "2"] {
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/todo", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let item: Item = body_json(resp).await;
        assert_eq!(item.id, expected_id);
    }

    assert_eq!(store.all_items().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_without_content_type_is_accepted() {
    let (app, _) = memory_app();
    let req = Request::builder()
        .method("POST")
        .uri("/todo")
        .body(Body::from(r#"{"description":"lowercase keys","completed":true}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.description, "lowercase keys");
    assert!(item.completed);
}

#[tokio::test]
async fn create_large_description_is_accepted() {
    let (app, store) = memory_app();
    let description = "x".repeat(3 * 1024 * 1024);
    let req = Request::builder()
        .method("POST")
        .uri("/todo")
        .body(Body::from(
            json!({"Description": description, "Completed": false}).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let items = store.all_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description.len(), description.len());
}

#[tokio::test]
async fn create_accepts_null_body_and_loose_keys() {
    let (app, store) = memory_app();

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/todo", "null"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"Id": "1", "Description": "", "Completed": false}));

    let resp = app
        .oneshot(json_request(
            "POST",
            "/todo",
            r#"{"DESCRIPTION":"loud","COMPLETED":true} and then some"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        store.get_item("2").await.unwrap(),
        Item::new("loud", true).with_id("2")
    );
}

#[tokio::test]
async fn create_invalid_json_returns_400_and_stores_nothing() {
    let (app, store) = memory_app();
    let resp = app
        .oneshot(json_request("POST", "/todo", r#"{"Description": "A""#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid request payload"}));
    assert!(store.all_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_wrong_field_type_returns_400() {
    let (app, store) = memory_app();
    let resp = app
        .oneshot(json_request("POST", "/todo", r#"{"Completed":"yes"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.all_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_store_error_returns_500() {
    let app = closed_sqlite_app().await;
    let resp = app
        .oneshot(json_request("POST", "/todo", r#"{"Description":"A"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "Database error occurred"}));
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let (app, _) = memory_app();
    let resp = app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_items_in_creation_order() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("A", false)).await.unwrap();
    store.create_item(&Item::new("B", true)).await.unwrap();

    let resp = app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(
        body,
        json!([
            {"Id": "1", "Description": "A", "Completed": false},
            {"Id": "2", "Description": "B", "Completed": true},
        ])
    );
}

#[tokio::test]
async fn list_store_error_returns_500() {
    let app = closed_sqlite_app().await;
    let resp = app.oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Database error occurred");
}

// --- get ---

#[tokio::test]
async fn get_item_returns_200() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("ABC", true)).await.unwrap();

    let resp = app.oneshot(empty_request("GET", "/todo/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let item: Item = body_json(resp).await;
    assert_eq!(item, Item::new("ABC", true).with_id("1"));
}

#[tokio::test]
async fn get_missing_item_returns_404() {
    let (app, _) = memory_app();
    let resp = app.oneshot(empty_request("GET", "/todo/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "item not found"}));
}

#[tokio::test]
async fn get_malformed_id_returns_500() {
    let app = todo_server::app(Arc::new(SqliteItemStore::open(":memory:").await.unwrap()));
    let resp = app
        .oneshot(empty_request("GET", "/todo/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "Database error occurred"}));
}

#[tokio::test]
async fn document_store_malformed_id_returns_500() {
    let app = document_app().await;

    for req in [
        empty_request("GET", "/todo/not-hex"),
        json_request("PUT", "/todo/not-hex", r#"{"Description":"x"}"#),
        empty_request("DELETE", "/todo/12345"),
    ] {
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = body_json(resp).await;
        assert_eq!(body, json!({"error": "Database error occurred"}));
    }
}

// --- update ---

#[tokio::test]
async fn update_item_replaces_fields() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("old", false)).await.unwrap();

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/todo/1",
            r#"{"Description":"new","Completed":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let item: Item = body_json(resp).await;
    assert_eq!(item, Item::new("new", true).with_id("1"));
    assert_eq!(store.get_item("1").await.unwrap(), item);
}

#[tokio::test]
async fn partial_update_overwrites_both_fields() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("keep", true)).await.unwrap();

    let resp = app
        .oneshot(json_request("PUT", "/todo/1", r#"{"Description":"only this"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let stored = store.get_item("1").await.unwrap();
    assert_eq!(stored.description, "only this");
    assert!(!stored.completed);
}

#[tokio::test]
async fn update_missing_item_returns_404() {
    let (app, _) = memory_app();
    let resp = app
        .oneshot(json_request("PUT", "/todo/7", r#"{"Description":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "item not found"}));
}

#[tokio::test]
async fn update_invalid_json_returns_400_and_keeps_item() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("untouched", false)).await.unwrap();

    let resp = app
        .oneshot(json_request("PUT", "/todo/1", "garbage"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid request payload"}));
    assert_eq!(store.get_item("1").await.unwrap().description, "untouched");
}

// --- delete ---

#[tokio::test]
async fn delete_item_returns_success() {
    let (app, store) = memory_app();
    store.create_item(&Item::new("A", false)).await.unwrap();

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", "/todo/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"result": "success"}));

    let resp = app.oneshot(empty_request("GET", "/todo/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_item_returns_404() {
    let (app, _) = memory_app();
    let resp = app
        .oneshot(empty_request("DELETE", "/todo/1327"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_store_error_returns_500() {
    let app = closed_sqlite_app().await;
    let resp = app
        .oneshot(empty_request("DELETE", "/todo/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- full flow on sqlite ---

#[tokio::test]
async fn sqlite_crud_flow() {
    let app = todo_server::app(Arc::new(SqliteItemStore::open(":memory:").await.unwrap()));

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/todo", r#"{"Description":"A","Completed":false}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/todo", r#"{"Description":"B","Completed":true}"#))
        .await
        .unwrap();
    let b: Item = body_json(resp).await;
    assert_eq!(b.id, "2");

    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/todo/1", r#"{"Description":"A2","Completed":true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", "/todo/2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(empty_request("GET", "/todos")).await.unwrap();
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items, vec![Item::new("A2", true).with_id("1")]);
}

// --- health ---

#[tokio::test]
async fn health_reports_backend() {
    let (app, store) = memory_app();

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"status": "ok", "backend": "memory"}));

    store.close().await;

    let resp = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "unavailable");
}

// --- routing ---

#[tokio::test]
async fn unknown_method_is_rejected() {
    let (app, _) = memory_app();
    let resp = app.oneshot(empty_request("PATCH", "/todo/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
