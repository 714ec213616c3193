//! 认证、公共接口和错误处理测试

mod common;

use axum::http::{Method, StatusCode};
use common::{admin_token, body_json, build_test_app, get, put_json, send, token, user_token};
use serde_json::json;

#[tokio::test]
async fn health_is_public() {
    let app = build_test_app();

    let response = send(&app.router, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["environment"], "test");
    assert_eq!(body["store"], "memory");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = build_test_app();

    let body = body_json(send(&app.router, Method::GET, "/", None, None).await).await;
    assert_eq!(body["message"], "🚀 Welcome to Projectify Backend API!");
    assert_eq!(body["endpoints"]["applications"], "/api/applications");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = build_test_app();

    let response = send(&app.router, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Access token required");
}

#[tokio::test]
async fn malformed_or_forged_token_is_unauthorized() {
    let app = build_test_app();

    let response = get(&app.router, "/api/auth/me", "").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app.router, "/api/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn first_request_provisions_user() {
    let app = build_test_app();

    let body = body_json(get(&app.router, "/api/auth/me", &user_token("alice")).await).await;
    assert_eq!(body["user"]["id"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["lastLogin"].is_string());

    let body = body_json(get(&app.router, "/api/auth/me", &admin_token()).await).await;
    assert_eq!(body["user"]["role"], "admin");

    let welcome = app.sender.wait_for_subject("Welcome to Projectify").await;
    assert!(welcome.is_some());
}

#[tokio::test]
async fn profile_update_keeps_missing_fields() {
    let app = build_test_app();
    let token = token("alice", "alice@example.com");

    let response = put_json(
        &app.router,
        "/api/auth/profile",
        &token,
        json!({ "jobTitle": "Backend Engineer", "techStack": "Rust" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["jobTitle"], "Backend Engineer");
    assert_eq!(body["user"]["name"], "alice");

    let response = put_json(&app.router, "/api/auth/profile", &token, json!({ "name": "A" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "name");
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let app = build_test_app();

    let response = send(&app.router, Method::GET, "/api/analytics", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "❌ Route not found");
}
