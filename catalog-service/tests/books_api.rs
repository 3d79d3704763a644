use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use catalog_service::routes::router;
use catalog_service::{BookService, Config, MemoryBackend};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let config = Config {
        reading_budget: Duration::from_secs(1),
        reading_min_delay: Duration::from_millis(1),
        reading_max_delay: Duration::from_millis(5),
        ..Config::default()
    };
    let service = BookService::from_config(Arc::new(MemoryBackend::new()), &config);
    router(Arc::new(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({ "title": title, "author": "Someone", "genre": "Fiction" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_reports_running() {
    let (status, body) = send(&app(), Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "catalog-service");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn book_crud_round_trip() {
    let app = app();
    let id = create(&app, "Middlemarch").await;

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Middlemarch");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "title": "Middlemarch", "author": "George Eliot", "genre": "Novel" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["author"], "George Eliot");

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_books_are_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::DELETE, "/books/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/books/77",
        Some(json!({ "title": "x", "author": "y", "genre": "z" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_path_id_is_bad_request() {
    let (status, _) = send(&app(), Method::GET, "/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_matches_title_substring() {
    let app = app();
    create(&app, "War and Peace").await;
    create(&app, "Anna Karenina").await;

    let (status, body) = send(&app, Method::GET, "/books/search/peace", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["War and Peace"]);

    let (status, _) = send(&app, Method::GET, "/books/search/odyssey", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn simulate_reports_outcomes_in_request_order() {
    let app = app();
    let first = create(&app, "Emma").await;
    let second = create(&app, "Persuasion").await;

    let uri = format!("/books/simulate/{},{},999,{}", first, second, first);
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested"], 4);
    assert_eq!(body["completed"], 3);
    assert_eq!(body["timed_out"], 0);

    let outcomes = body["outcomes"].as_array().unwrap();
    let statuses: Vec<_> = outcomes.iter().map(|o| o["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["success", "success", "not_found", "success"]);
    assert_eq!(outcomes[0]["book_id"], first);
    assert_eq!(outcomes[2]["book_id"], 999);
    assert_eq!(outcomes[3]["session"]["title"], "Emma");
}

#[tokio::test]
async fn simulate_rejects_non_positive_budget() {
    let app = app();
    let id = create(&app, "Emma").await;

    for budget in ["0", "-5"] {
        let uri = format!("/books/simulate/{}?budget_ms={}", id, budget);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("budget"));
    }
}
