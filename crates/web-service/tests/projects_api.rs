//! 项目发布与浏览接口测试

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, build_test_app_with, gateway_project, get, post_json, put_json,
    user_token, RecordingSender,
};
use serde_json::json;

#[tokio::test]
async fn publish_gateway_notifies_all_users() {
    let app = build_test_app();
    // 先访问一次完成用户创建
    for uid in ["u1", "u2", "u3"] {
        assert_eq!(get(&app.router, "/api/auth/me", &user_token(uid)).await.status(), StatusCode::OK);
    }

    let response = post_json(&app.router, "/api/admin-projects", &admin_token(), gateway_project()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["project"]["title"], "API Gateway");
    assert_eq!(body["project"]["status"], "active");
    assert_eq!(body["notifications"]["totalUsers"], 3);
    assert_eq!(body["notifications"]["emailsSent"], 3);
    assert_eq!(body["notifications"]["emailsFailed"], 0);
}

#[tokio::test]
async fn publish_succeeds_when_some_mails_fail() {
    let app = build_test_app_with(RecordingSender::failing(&["u2@example.com"]));
    for uid in ["u1", "u2", "u3", "u4"] {
        get(&app.router, "/api/auth/me", &user_token(uid)).await;
    }

    let response = post_json(&app.router, "/api/admin-projects", &admin_token(), gateway_project()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["notifications"]["totalUsers"], 4);
    assert_eq!(body["notifications"]["emailsSent"], 3);
    assert_eq!(body["notifications"]["emailsFailed"], 1);
}

#[tokio::test]
async fn publish_rejects_invalid_payload() {
    let app = build_test_app();
    let payload = json!({
        "title": "AG",
        "role": "Backend Developer",
        "description": "too short",
        "timeline": "3 months",
        "deadlineToApply": "2025-12-31"
    });

    let response = post_json(&app.router, "/api/admin-projects", &admin_token(), payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["description", "title"]);

    let listed = body_json(get(&app.router, "/api/admin-projects", &admin_token()).await).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn users_cannot_publish() {
    let app = build_test_app();

    let response = post_json(&app.router, "/api/admin-projects", &user_token("u1"), gateway_project()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Admin access required");
}

#[tokio::test]
async fn users_see_open_projects_without_details() {
    let app = build_test_app();
    let id = common::publish_gateway(&app.router).await;

    let body = body_json(get(&app.router, "/api/admin-projects", &user_token("u1")).await).await;
    assert_eq!(body["total"], 1);
    assert!(body["projects"][0].get("projectDetails").is_none());

    let body = body_json(get(&app.router, &format!("/api/admin-projects/{id}"), &admin_token()).await).await;
    assert_eq!(body["project"]["projectDetails"], "Internal architecture notes");
}

#[tokio::test]
async fn cancelled_project_is_hidden_from_users() {
    let app = build_test_app();
    let id = common::publish_gateway(&app.router).await;

    let response = put_json(
        &app.router,
        &format!("/api/admin-projects/{id}/status"),
        &admin_token(),
        json!({ "status": "cancelled", "reason": "Budget cut" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["project"]["status"], "cancelled");
    assert_eq!(body["project"]["statusReason"], "Budget cut");

    let response = get(&app.router, &format!("/api/admin-projects/{id}"), &user_token("u1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        &app.router,
        &format!("/api/admin-projects/{id}/status"),
        &admin_token(),
        json!({ "status": "active" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_reports_recipient() {
    let app = build_test_app();

    let body = body_json(get(&app.router, "/api/admin-projects/test-email", &admin_token()).await).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["totalUsers"], 0);

    get(&app.router, "/api/auth/me", &user_token("u1")).await;
    let response = get(&app.router, "/api/admin-projects/test-email", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["sentTo"], "u1@example.com");
    assert_eq!(body["totalUsers"], 1);
}

#[tokio::test]
async fn test_email_failure_is_server_error() {
    let app = build_test_app_with(RecordingSender::failing(&["u1@example.com"]));
    get(&app.router, "/api/auth/me", &user_token("u1")).await;

    let response = get(&app.router, "/api/admin-projects/test-email", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Test email failed");
}
