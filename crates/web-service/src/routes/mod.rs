//! 路由入口
//!
//! 提供 [`create_app_router`] 函数，导出当前App的所有路由。
//!
//! 所有业务接口都挂在 `/api` 下，共享数据 [`AppState`] 在导出路由时传入，所有路由函数都可以访问。

use crate::models::common::WelcomeReply;
use crate::models::err::AppError;
use crate::routes::applications::__path_approve_application;
use crate::routes::applications::__path_list_applications;
use crate::routes::applications::__path_my_applications;
use crate::routes::applications::__path_reject_application;
use crate::routes::applications::__path_submit_application;
use crate::routes::applications::__path_update_application_status;
use crate::routes::applications::{
    approve_application, list_applications, my_applications, reject_application, submit_application,
    update_application_status,
};
use crate::routes::auth::__path_current_user;
use crate::routes::auth::__path_update_profile;
use crate::routes::auth::{current_user, update_profile};
use crate::routes::health::__path_health_check;
use crate::routes::health::health_check;
use crate::routes::projects::__path_create_project;
use crate::routes::projects::__path_get_project;
use crate::routes::projects::__path_list_projects;
use crate::routes::projects::__path_send_test_email;
use crate::routes::projects::__path_update_project_status;
use crate::routes::projects::{create_project, get_project, list_projects, send_test_email, update_project_status};
use crate::routes::subscriptions::__path_subscribe;
use crate::routes::subscriptions::subscribe;
use crate::routes::teams::__path_create_team;
use crate::routes::teams::__path_list_teams;
use crate::routes::teams::{create_team, list_teams};
use crate::routes::users::__path_delete_user;
use crate::routes::users::__path_get_user;
use crate::routes::users::__path_list_users;
use crate::routes::users::__path_notification_recipients;
use crate::routes::users::__path_update_user_status;
use crate::routes::users::{delete_user, get_user, list_users, notification_recipients, update_user_status};
use crate::AppState;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Uri};
use axum::routing::get;
use axum::{Json, Router};
use shared_lib::ServerConfig;
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable};

pub mod applications;
pub mod auth;
pub mod health;
pub mod projects;
pub mod subscriptions;
pub mod teams;
pub mod users;

/// 导出当前App的所有路由
///
/// ## **❗️注意事项：**
///
/// 由于 [`routes!`] 宏限制，在同一个宏里面不能同时定义多个相同类型的http接口，
/// 同一路径下的不同方法可以放在一起，相同方法需要拆开定义：
///
/// ```rust,ignore
/// routes!(get, post)
/// .routes!(get)
/// ```
fn routers(state: AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(current_user))
        .routes(routes!(update_profile))
        .routes(routes!(submit_application, list_applications))
        .routes(routes!(my_applications))
        .routes(routes!(approve_application))
        .routes(routes!(reject_application))
        .routes(routes!(update_application_status))
        .routes(routes!(create_project, list_projects))
        .routes(routes!(send_test_email))
        .routes(routes!(get_project))
        .routes(routes!(update_project_status))
        .routes(routes!(list_users))
        .routes(routes!(notification_recipients))
        .routes(routes!(get_user, delete_user))
        .routes(routes!(update_user_status))
        .routes(routes!(create_team, list_teams))
        .routes(routes!(subscribe))
        .with_state(state)
}

/// 创建当前App的路由
///
/// 完成以下功能：
/// - 生成OpenAPI文档，使用Scalar作为在线文档格式
/// - 生成App路由
/// - 跨域和请求日志中间件
/// - 未知路由返回json格式的404
pub fn create_app_router(shared_state: AppState, config: &ServerConfig) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Projectify", description = "Projectify 项目撮合平台后端接口"),
        tags(
            (name = "health", description = "健康检查"),
            (name = "auth", description = "当前用户"),
            (name = "applications", description = "项目申请与审批"),
            (name = "projects", description = "项目发布与浏览"),
            (name = "users", description = "用户管理（管理员）"),
            (name = "teams", description = "团队管理（管理员）"),
            (name = "subscriptions", description = "实时数据订阅（SSE）"),
        ),
    )]
    struct ApiDoc;

    let started_at = shared_state.runtime.started_at;

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routers(shared_state))
        .split_for_parts();

    // 用户可通过 /docs 访问文档网页地址
    router
        .merge(Scalar::with_url("/docs", api))
        .route(
            "/",
            get(move || async move { Json(welcome(started_at.elapsed().as_secs_f64())) }),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

/// 跨域配置，只允许白名单中的来源并携带凭证
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ 忽略无效的跨域来源: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

fn welcome(uptime: f64) -> WelcomeReply {
    let endpoints = [
        ("health", "/api/health"),
        ("auth", "/api/auth"),
        ("admin-projects", "/api/admin-projects"),
        ("applications", "/api/applications"),
        ("users", "/api/users"),
        ("teams", "/api/teams"),
        ("subscriptions", "/api/subscriptions"),
        ("docs", "/docs"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<BTreeMap<_, _>>();

    WelcomeReply {
        success: true,
        message: "🚀 Welcome to Projectify Backend API!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
        timestamp: chrono::Utc::now().to_rfc3339(),
        endpoints,
    }
}

async fn route_not_found(uri: Uri) -> AppError {
    debug!("❓ 未知路由: {}", uri);
    AppError::RouteNotFound(uri.path().to_string())
}
