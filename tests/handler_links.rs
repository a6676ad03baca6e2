mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shortlinks::infrastructure::persistence::MemoryLinkRepository;
use std::sync::Arc;

#[tokio::test]
async fn test_create_link_with_alias() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/docs", "alias": "docs" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["alias"], "docs");
    assert_eq!(body["url"], "https://example.com/docs");
    assert_eq!(body["visits"], 0);
    assert_eq!(body["short_url"], "https://sho.rt/docs");
    assert!(body["created_at"].is_string());
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_create_link_generates_alias() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/generated" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let alias = body["alias"].as_str().unwrap();
    assert_eq!(alias.len(), 7);
    assert!(alias.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_create_link_empty_alias_generates_alias() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "alias": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["alias"].as_str().unwrap().len(), 7);
}

#[tokio::test]
async fn test_create_link_reports_both_invalid_fields() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "ftp://example.com", "alias": "my alias" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["url"], true);
    assert_eq!(body["error"]["details"]["alias"], true);
}

#[tokio::test]
async fn test_create_link_invalid_url_only() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "javascript:alert(1)", "alias": "ok-alias" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["url"], true);
    assert_eq!(body["error"]["details"]["alias"], false);
}

#[tokio::test]
async fn test_create_link_alias_taken() {
    let service = common::memory_service();
    common::create_test_link(&service, "foo", "https://example.com/a").await;
    let server = common::create_test_server(service.clone());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/b", "alias": "foo" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");

    let record = service.get_link("foo").await.unwrap();
    assert_eq!(record.url, "https://example.com/a");
}

#[tokio::test]
async fn test_create_link_alias_space_exhausted() {
    let service = common::create_service(
        Arc::new(MemoryLinkRepository::new()),
        Arc::new(common::ScriptedAliasGenerator::new(&["taken"])),
        4,
    );
    common::create_test_link(&service, "taken", "https://example.com/a").await;
    let server = common::create_test_server(service);

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com/b" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["details"]["reason"], "alias_space_exhausted");
}

#[tokio::test]
async fn test_create_link_oversized_alias() {
    let server = common::create_test_server(common::memory_service());

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "alias": "a".repeat(65) }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_link_storage_unavailable() {
    let server = common::unavailable_server();

    let response = server
        .post("/api/links")
        .json(&json!({ "url": "https://example.com", "alias": "docs" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "storage_unavailable");
    assert!(
        !body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused")
    );
}

#[tokio::test]
async fn test_get_link_does_not_count_visit() {
    let service = common::memory_service();
    common::create_test_link(&service, "docs", "https://example.com/docs").await;
    let server = common::create_test_server(service.clone());

    for _ in 0..2 {
        server.get("/api/links/docs").await.assert_status_ok();
    }

    let body: Value = server.get("/api/links/docs").await.json();
    assert_eq!(body["alias"], "docs");
    assert_eq!(body["visits"], 0);
}

#[tokio::test]
async fn test_get_link_not_found() {
    let server = common::create_test_server(common::memory_service());

    let response = server.get("/api/links/missing").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_latest_links_newest_first() {
    let service = common::memory_service();
    for alias in ["first", "second", "third"] {
        common::create_test_link(&service, alias, "https://example.com").await;
    }
    let server = common::create_test_server(service);

    let response = server.get("/api/links/latest").add_query_param("limit", 2).await;

    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    let aliases: Vec<&str> = body.iter().map(|l| l["alias"].as_str().unwrap()).collect();
    assert_eq!(aliases, vec!["third", "second"]);
}

#[tokio::test]
async fn test_popular_links_most_visited_first() {
    let service = common::memory_service();
    for alias in ["quiet", "busy", "medium"] {
        common::create_test_link(&service, alias, "https://example.com").await;
    }
    for _ in 0..3 {
        service.resolve_link("busy").await.unwrap();
    }
    service.resolve_link("medium").await.unwrap();
    let server = common::create_test_server(service);

    let response = server.get("/api/links/popular").await;

    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    let aliases: Vec<&str> = body.iter().map(|l| l["alias"].as_str().unwrap()).collect();
    assert_eq!(aliases, vec!["busy", "medium", "quiet"]);
    assert_eq!(body[0]["visits"], 3);
}

#[tokio::test]
async fn test_listing_limit_out_of_range() {
    let server = common::create_test_server(common::memory_service());

    server
        .get("/api/links/latest")
        .add_query_param("limit", 0)
        .await
        .assert_status_bad_request();

    server
        .get("/api/links/popular")
        .add_query_param("limit", 101)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_listing_storage_unavailable() {
    let server = common::unavailable_server();

    let response = server.get("/api/links/latest").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
