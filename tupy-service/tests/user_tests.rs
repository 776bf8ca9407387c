mod common;

use std::collections::HashSet;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_user_with_role() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .post_authenticated("/api/v1/users", &token)
        .json(&json!({
            "email": "courier@example.com",
            "first_name": "Carl",
            "last_name": "Courier",
            "password": "password",
            "role": "COURIER"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "courier@example.com");
    assert_eq!(body["role"], "COURIER");
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_non_admin_cannot_create_users() {
    let app = TestApp::spawn().await;
    let admin_token = app.admin_token().await;

    app.post_authenticated("/api/v1/users", &admin_token)
        .json(&json!({
            "email": "client@example.com",
            "first_name": "Cleo",
            "last_name": "Client",
            "password": "password",
            "role": "CLIENT"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let login: serde_json::Value = app
        .post("/api/v1/authentication/login")
        .json(&json!({ "email": "client@example.com", "password": "password" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let client_token = login["access_token"].as_str().unwrap();

    let response = app
        .post_authenticated("/api/v1/users", client_token)
        .json(&json!({
            "email": "another@example.com",
            "first_name": "Ann",
            "last_name": "Other",
            "password": "password",
            "role": "ADMIN"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Forbidden by role.");
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .post_authenticated("/api/v1/users", &token)
        .json(&json!({
            "email": "admin@example.com",
            "first_name": "Admin",
            "last_name": "Again",
            "password": "password",
            "role": "ADMIN"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = TestApp::spawn().await;
    let signed_up = app.sign_up("bob@example.com").await;
    let token = signed_up["access_token"].as_str().unwrap();
    let id = signed_up["id"].as_i64().unwrap();

    let response = app
        .get_authenticated(&format!("/api/v1/users/{id}"), token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], id);
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .get_authenticated("/api/v1/users/999999", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .get_authenticated("/api/v1/users/not-a-number", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_pages_cover_every_user_once() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for n in 0..6 {
        app.sign_up(&format!("user{n}@example.com")).await;
    }

    let mut seen = HashSet::new();
    let mut collected = 0;
    for page in 1..=4 {
        let body: serde_json::Value = app
            .get_authenticated(&format!("/api/v1/users?page={page}&page_size=2"), &token)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        assert_eq!(body["total"], 7);
        assert_eq!(body["page"], page);
        assert_eq!(body["page_size"], 2);

        for item in body["items"].as_array().unwrap() {
            assert!(seen.insert(item["id"].as_i64().unwrap()));
            assert!(item.get("hashed_password").is_none());
            collected += 1;
        }
    }

    assert_eq!(collected, 7);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .get_authenticated("/api/v1/users?page=50&page_size=10", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_invalid_pagination_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for query in ["page=0", "page_size=1", "page_size=101", "page=abc"] {
        let response = app
            .get_authenticated(&format!("/api/v1/users?{query}"), &token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{query}"
        );
    }
}
