//! The demo application served in memory.

use std::path::Path;

use http::StatusCode;
use minos::prelude::*;
use minos_test::TestClient;
use serde_json::json;

fn client() -> TestClient {
    let base = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut app = minos_helloworld::app(base, AppOptions::default())
        .environment(Environment::new("test"));
    app.initialize().unwrap();
    assert_eq!(app.port().unwrap(), 3000);

    TestClient::new(app.routes().unwrap())
}

#[tokio::test]
async fn test_home_page_uses_layout_and_mixin() {
    let response = client().get("/").send().await;

    response
        .assert_status(StatusCode::OK)
        .assert_body_contains("<title>Hello World | Home</title>")
        .assert_body_contains("Served by the index action.");
}

#[tokio::test]
async fn test_user_list() {
    client()
        .get("/users")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("<li>Ada</li>");
}

#[tokio::test]
async fn test_show_user_as_json() {
    let response = client().get("/users/1").xhr().send().await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json_value().unwrap()["name"], "Ada");
}

#[tokio::test]
async fn test_missing_user_falls_through_to_error_controller() {
    client()
        .get("/users/99")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_body_contains("<h1>Not found</h1>");
}

#[tokio::test]
async fn test_unknown_path() {
    client()
        .get("/no/such/page")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_login() {
    client()
        .post("/users")
        .json(&json!({ "name": "Grace" }))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_body_eq("Log in first.");
}

#[tokio::test]
async fn test_create_user() {
    let client = client();

    let response = client
        .post("/users")
        .header("x-user", "tester")
        .json(&json!({ "name": "Grace" }))
        .send()
        .await;

    response.assert_status(StatusCode::CREATED);
    let user = response.json_value().unwrap();
    assert_eq!(user["id"], 2);
    assert_eq!(user["created_by"], "tester");

    client
        .get("/users")
        .send()
        .await
        .assert_body_contains("<li>Grace</li>");
}

#[tokio::test]
async fn test_invalid_user_renders_error_page() {
    let response = client()
        .post("/users")
        .header("x-user", "tester")
        .json(&json!({ "name": " " }))
        .send()
        .await;

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_body_contains("An error occurred. Please try again.")
        .assert_body_contains("<title>Error</title>");
}

#[tokio::test]
async fn test_invalid_user_over_xhr() {
    let response = client()
        .post("/users")
        .xhr()
        .header("x-user", "tester")
        .json(&json!({ "name": "" }))
        .send()
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json_value().unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"]["incident"].is_string());
    assert!(body["error"].get("detail").is_none());
}

#[tokio::test]
async fn test_delete_user() {
    let client = client();

    client
        .delete("/users/1")
        .header("x-user", "tester")
        .send()
        .await
        .assert_status(StatusCode::NO_CONTENT);

    client
        .get("/users/1")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
