//! HTTP集成测试公共工具
//!
//! 使用内存存储和记录型邮件发送器构建完整的路由，和 `main` 中的组装方式一致。

#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use database::Repositories;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use mail_service::{Delivery, EmailMessage, MailError, NotificationSender};
use serde_json::Value;
use shared_lib::AppConfig;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use web_service::auth::{Claims, JwtIdentityProvider};
use web_service::services::Services;
use web_service::{create_app_router, AppState};

pub const JWT_SECRET: &str = "integration-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// 记录所有邮件，对 `failing` 中的地址返回错误
#[derive(Default)]
pub struct RecordingSender {
    failing: HashSet<String>,
    messages: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn failing(emails: &[&str]) -> Self {
        Self {
            failing: emails.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub async fn wait_for_subject(&self, subject: &str) -> Option<EmailMessage> {
        for _ in 0..200 {
            if let Some(found) = self.sent().into_iter().find(|m| m.subject.contains(subject)) {
                return Some(found);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

#[async_trait::async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: EmailMessage) -> Result<Delivery, MailError> {
        if self.failing.contains(&message.to) {
            return Err(MailError::Build("mailbox unavailable".to_string()));
        }
        self.messages.lock().unwrap().push(message);
        Ok(Delivery::Sent {
            message_id: "<test@localhost>".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub sender: Arc<RecordingSender>,
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "AUTH_JWT_SECRET" => Some(JWT_SECRET.to_string()),
        "ADMIN_EMAILS" => Some(ADMIN_EMAIL.to_string()),
        "FRONTEND_URL" => Some("http://localhost:3000".to_string()),
        "APP_ENV" => Some("test".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(RecordingSender::default())
}

/// 构建完整的应用路由
pub fn build_test_app_with(sender: RecordingSender) -> TestApp {
    let config = test_config();
    let repositories = Repositories::in_memory();
    let sender = Arc::new(sender);

    let services = Services::new(&repositories, sender.clone(), &config);
    let state = AppState::new(
        Arc::new(JwtIdentityProvider::new(&config.auth.jwt_secret)),
        services,
        config.server.environment.clone(),
        repositories.kind,
    );

    TestApp {
        router: create_app_router(state, &config.server),
        sender,
    }
}

/// 签发测试令牌，一小时后过期
pub fn token(uid: &str, email: &str) -> String {
    let claims = Claims {
        sub: uid.to_string(),
        email: email.to_string(),
        name: Some(uid.to_string()),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap()
}

pub fn admin_token() -> String {
    token("admin-1", ADMIN_EMAIL)
}

pub fn user_token(uid: &str) -> String {
    token(uid, &format!("{uid}@example.com"))
}

pub async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn gateway_project() -> Value {
    serde_json::json!({
        "title": "API Gateway",
        "role": "Backend Developer",
        "description": "Build a high performance API gateway in Rust",
        "timeline": "3 months",
        "deadlineToApply": "2025-12-31",
        "projectDetails": "Internal architecture notes"
    })
}

pub fn application_for(project_id: &str) -> Value {
    serde_json::json!({
        "projectId": project_id,
        "username": "alice",
        "contact": "alice@example.com",
        "skillsDescription": "Rust, PostgreSQL and distributed systems",
        "experience": "5 years",
        "deadline": 14
    })
}

/// 发布 "API Gateway" 项目并返回项目id
pub async fn publish_gateway(app: &Router) -> String {
    let response = post_json(app, "/api/admin-projects", &admin_token(), gateway_project()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["project"]["id"].as_str().unwrap().to_string()
}
