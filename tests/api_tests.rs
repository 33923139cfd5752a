//! Catalog service API tests, driven in-process

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};

use common::{call, delete, get, json, service_router};

async fn create(app: &axum::Router, body: Value) -> Value {
    let (status, book) = call(app, json("POST", "/books", body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", book);
    book
}

#[tokio::test]
async fn test_health_check() {
    let app = service_router().await;
    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "A", "author": "B", "year": 2000, "genre": "G"})).await;
    let id = created["id"].as_i64().expect("No book ID");

    let (status, fetched) = call(&app, get(&format!("/books/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched,
        json!({"id": id, "title": "A", "author": "B", "year": 2000, "genre": "G"})
    );
}

#[tokio::test]
async fn test_create_trims_and_accepts_string_year() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "  Rayuela  ", "author": "Julio Cortázar ", "year": "1963"})).await;
    assert_eq!(created["title"], "Rayuela");
    assert_eq!(created["author"], "Julio Cortázar");
    assert_eq!(created["year"], 1963);
    assert_eq!(created["genre"], Value::Null);
}

#[tokio::test]
async fn test_list_is_sorted_by_title() {
    let app = service_router().await;
    for title in ["apple", "Zebra", "Banana", "Cien años de soledad"] {
        create(&app, json!({"title": title, "author": "X"})).await;
    }

    let (status, body) = call(&app, get("/books")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Banana", "Cien años de soledad", "Zebra", "apple"]);
}

#[tokio::test]
async fn test_create_requires_title_and_author() {
    let app = service_router().await;

    for body in [
        json!({"title": "", "author": "B"}),
        json!({"title": "A", "author": "   "}),
        json!({"author": "B"}),
        json!({}),
    ] {
        let (status, error) = call(&app, json("POST", "/books", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "validation_error");
        assert_eq!(error["message"], "title and author are required");
    }

    let (_, books) = call(&app, get("/books")).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_non_integer_year_is_rejected_without_mutation() {
    let app = service_router().await;

    let (status, error) = call(&app, json("POST", "/books", json!({"title": "A", "author": "B", "year": "abc"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "validation_error", "message": "year must be integer"}));

    let created = create(&app, json!({"title": "A", "author": "B", "year": 1999})).await;
    let uri = format!("/books/{}", created["id"]);
    let (status, error) = call(&app, json("PUT", &uri, json!({"title": "Changed", "year": "abc"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "validation_error");

    let (_, fetched) = call(&app, get(&uri)).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_partial_update_keeps_absent_fields() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "El Quijote", "author": "Cervantes", "year": 1605, "genre": "Novela"})).await;
    let uri = format!("/books/{}", created["id"]);

    let (status, updated) = call(&app, json("PUT", &uri, json!({"author": " Miguel de Cervantes "}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["author"], "Miguel de Cervantes");
    assert_eq!(updated["title"], "El Quijote");
    assert_eq!(updated["year"], 1605);
    assert_eq!(updated["genre"], "Novela");

    let (_, fetched) = call(&app, get(&uri)).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_empty_string_clears_optional_fields() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "A", "author": "B", "year": 2000, "genre": "G"})).await;
    let uri = format!("/books/{}", created["id"]);

    let (status, updated) = call(&app, json("PUT", &uri, json!({"year": "", "genre": "  "}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["year"], Value::Null);
    assert_eq!(updated["genre"], Value::Null);

    let (_, updated) = call(&app, json("PUT", &uri, json!({"year": 2001, "genre": null}))).await;
    assert_eq!(updated["year"], 2001);
    assert_eq!(updated["genre"], Value::Null);

    let (status, unchanged) = call(&app, json("PUT", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn test_update_cannot_empty_required_fields() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "A", "author": "B"})).await;
    let uri = format!("/books/{}", created["id"]);

    let (status, error) = call(&app, json("PUT", &uri, json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "validation_error", "message": "title cannot be empty"}));

    let (_, error) = call(&app, json("PUT", &uri, json!({"author": ""}))).await;
    assert_eq!(error["message"], "author cannot be empty");
}

#[tokio::test]
async fn test_update_unknown_book_is_not_found() {
    let app = service_router().await;
    let (status, error) = call(&app, json("PUT", "/books/42", json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({"error": "not_found", "message": "Book not found"}));
}

#[tokio::test]
async fn test_delete_twice() {
    let app = service_router().await;
    let created = create(&app, json!({"title": "A", "author": "B"})).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/books/{}", id);

    let (status, body) = call(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted", "id": id}));

    let (status, body) = call(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = call(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_are_never_reused() {
    let app = service_router().await;
    let first = create(&app, json!({"title": "A", "author": "B"})).await["id"].as_i64().unwrap();
    let second = create(&app, json!({"title": "C", "author": "D"})).await["id"].as_i64().unwrap();
    assert_ne!(first, second);

    call(&app, delete(&format!("/books/{}", second))).await;
    let third = create(&app, json!({"title": "E", "author": "F"})).await["id"].as_i64().unwrap();
    assert!(third > second);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = service_router().await;
    let request = Request::post("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, error) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "bad_request");

    let (status, error) = call(&app, json("POST", "/books", json!("just a string"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "bad_request");
}

#[tokio::test]
async fn test_wrong_content_type_is_bad_request() {
    let app = service_router().await;
    let request = Request::post("/books")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(json!({"title": "A", "author": "B"}).to_string()))
        .unwrap();
    let (status, error) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "bad_request", "message": "JSON body required"}));

    let created = create(&app, json!({"title": "A", "author": "B"})).await;
    let request = Request::put(format!("/books/{}", created["id"]))
        .body(Body::from("title=x"))
        .unwrap();
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let app = service_router().await;

    let (status, error) = call(&app, get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({"error": "not_found", "message": "Resource not found"}));

    let (status, error) = call(&app, get("/books/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "not_found");
}

#[tokio::test]
async fn test_unsupported_methods_use_error_envelope() {
    let app = service_router().await;
    create(&app, json!({"title": "Dune", "author": "Herbert"})).await;

    let requests = [
        json("PATCH", "/books/1", json!({"title": "Other"})),
        json("POST", "/health", json!({})),
        delete("/books"),
    ];
    for request in requests {
        let (status, error) = call(&app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error, json!({"error": "bad_request", "message": "Method not allowed"}));
    }

    let (_, book) = call(&app, get("/books/1")).await;
    assert_eq!(book["title"], "Dune");
}

#[tokio::test]
async fn test_overlong_fields_are_rejected() {
    let app = service_router().await;
    let (status, error) = call(
        &app,
        json("POST", "/books", json!({"title": "A", "author": "B", "genre": "g".repeat(81)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "genre must be at most 80 characters");

    let (_, books) = call(&app, get("/books")).await;
    assert_eq!(books, json!([]));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = service_router().await;
    let (status, doc) = call(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/books/{id}"].is_object());
}
