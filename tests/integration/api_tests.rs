//! API integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use public_library_server::{
    api,
    config::{AppConfig, StorageBackend},
    models::Book,
    repository::{BookRepository, Repository},
    services::Services,
    AppError, AppResult, AppState,
};

fn app_with(repository: Repository) -> Router {
    let mut config = AppConfig::default();
    config.database.backend = StorageBackend::Memory;

    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    })
}

fn app() -> Router {
    app_with(Repository::in_memory())
}

/// Storage whose every call fails, as a dropped database connection would
struct BrokenRepository;

const STORAGE_FAILURE: &str = "connection to server was lost";

#[async_trait]
impl BookRepository for BrokenRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Err(AppError::Internal(STORAGE_FAILURE.to_string()))
    }

    async fn find_by_id(&self, _id: i64) -> AppResult<Option<Book>> {
        Err(AppError::Internal(STORAGE_FAILURE.to_string()))
    }

    async fn save(&self, _book: Book) -> AppResult<Book> {
        Err(AppError::Internal(STORAGE_FAILURE.to_string()))
    }

    async fn delete(&self, _book: &Book) -> AppResult<()> {
        Err(AppError::Internal(STORAGE_FAILURE.to_string()))
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => send_raw(app, method, uri, Some(&body.to_string())).await,
        None => send_raw(app, method, uri, None).await,
    }
}

/// Send `body` verbatim as `application/json`, or no body and no content type at all
async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Error body is not JSON")
    };
    (status, json)
}

fn dune() -> Value {
    json!({
        "title": "Dune",
        "author": "Herbert",
        "isbn": "9780441013593",
        "publishedYear": 1965,
        "genre": "Sci-Fi"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/v1/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("No book ID");
    for field in ["title", "author", "isbn", "publishedYear", "genre"] {
        assert_eq!(created[field], dune()[field], "field {}", field);
    }

    let (status, fetched) = send(&app, Method::GET, &format!("/v1/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::DELETE, &format!("/v1/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/v1/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Book not found with id : '{}'", id));
    assert_eq!(body["details"], format!("uri=/v1/books/{}", id));
}

#[tokio::test]
async fn test_list_books() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/v1/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Books not found with All : 'All'");
    assert_eq!(body["details"], "uri=/v1/books");

    send(&app, Method::POST, "/v1/books", Some(dune())).await;
    let mut second = dune();
    second["title"] = json!("Children of Dune");
    send(&app, Method::POST, "/v1/books", Some(second)).await;

    let (status, body) = send(&app, Method::GET, "/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().expect("Expected an array");
    assert_eq!(books.len(), 2);
    assert_eq!(books[1]["title"], "Children of Dune");
}

#[tokio::test]
async fn test_create_book_validation() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/books",
        Some(json!({ "title": "", "isbn": "123", "publishedYear": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Title is required, Author is required, \
         Published year must be a positive integer, Genre is required"
    );
    assert_eq!(body["details"], "uri=/v1/books");

    let (status, body) = send(&app, Method::POST, "/v1/books", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book request payload is required");
}

#[tokio::test]
async fn test_update_book_merges_fields() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/v1/books", Some(dune())).await;
    let uri = format!("/v1/books/{}", created["id"]);

    let patch = json!({ "title": "", "author": "Frank Herbert", "publishedYear": 0 });
    let (status, updated) = send(&app, Method::PUT, &uri, Some(patch.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Dune");
    assert_eq!(updated["author"], "Frank Herbert");
    assert_eq!(updated["isbn"], "9780441013593");
    assert_eq!(updated["publishedYear"], 1965);
    assert_eq!(updated["genre"], "Sci-Fi");

    let (_, again) = send(&app, Method::PUT, &uri, Some(patch)).await;
    assert_eq!(again, updated);
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let app = app();

    let (status, _) = send(&app, Method::PUT, "/v1/books/42", Some(dune())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/v1/books/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"], "uri=/v1/books/42");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app_with(Repository {
        books: Arc::new(BrokenRepository),
    });

    let (status, body) = send(&app, Method::GET, "/v1/books/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], STORAGE_FAILURE);
    assert_eq!(body["details"], "uri=/v1/books/1");

    let (status, body) = send(&app, Method::POST, "/v1/books", Some(dune())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], STORAGE_FAILURE);
    assert_eq!(body["details"], "uri=/v1/books");
}

#[tokio::test]
async fn test_unreadable_body_is_error_object() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/v1/books", Some(dune())).await;
    let uri = format!("/v1/books/{}", created["id"]);

    let (status, body) = send_raw(&app, Method::PUT, &uri, Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse the request body as JSON"));
    assert_eq!(body["details"], format!("uri={}", uri));

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/v1/books",
        Some(r#"{"title": "Dune", "publishedYear": "nineteen"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert_ne!(message, "Book request payload is required");
    assert!(message.contains("publishedYear"), "message: {}", message);
    assert_eq!(body["details"], "uri=/v1/books");
}

#[tokio::test]
async fn test_update_without_body() {
    let app = app();

    let (status, body) = send(&app, Method::PUT, "/v1/books/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found with id : '999'");
    assert_eq!(body["details"], "uri=/v1/books/999");

    let (_, created) = send(&app, Method::POST, "/v1/books", Some(dune())).await;
    let uri = format!("/v1/books/{}", created["id"]);
    let (status, unchanged) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn test_non_integer_id_is_error_object() {
    let app = app();

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let (status, body) = send(&app, method, "/v1/books/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("abc"));
        assert_eq!(body["details"], "uri=/v1/books/abc");
    }
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/books/{id}"].is_object());
}

// Live server tests. Run with: cargo test -- --ignored
// against a server started with the default configuration.
mod live {
    use reqwest::Client;
    use serde_json::Value;

    const BASE_URL: &str = "http://localhost:8080";

    #[tokio::test]
    #[ignore]
    async fn test_live_create_get_delete() {
        let client = Client::new();

        let response = client
            .post(format!("{}/v1/books", BASE_URL))
            .json(&super::dune())
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Failed to parse response");
        let id = body["id"].as_i64().expect("No book ID");

        let response = client
            .get(format!("{}/v1/books/{}", BASE_URL, id))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let response = client
            .delete(format!("{}/v1/books/{}", BASE_URL, id))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 204);

        let response = client
            .get(format!("{}/v1/books/{}", BASE_URL, id))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 404);
    }
}
