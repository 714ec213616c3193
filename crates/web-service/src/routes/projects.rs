//! 项目相关接口
//!
//! 发布项目时会同步群发新项目通知，通知结果随响应一起返回。

use crate::auth::{AuthUser, RequireAdmin};
use crate::models::common::{AppJson, ErrorReply};
use crate::models::err::AppError;
use crate::models::projects::{
    ProjectCreateRequest, ProjectListReply, ProjectPublishReply, ProjectReply, ProjectStatusRequest, TestEmailReply,
};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;
use validator::Validate;

/// 发布项目
///
/// 项目创建后状态即为 `active`，随后给所有普通用户发送新项目通知。
/// 通知失败不影响项目发布，失败数量体现在 `notifications` 中。
#[utoipa::path(post,
    path = "/admin-projects",
    tag = "projects",
    request_body = ProjectCreateRequest,
    responses(
        (status = 201, description = "Project published", body = ProjectPublishReply),
        (status = 400, description = "Validation failed", body = ErrorReply),
        (status = 403, description = "Admin access required", body = ErrorReply)
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(payload): AppJson<ProjectCreateRequest>,
) -> Result<(StatusCode, Json<ProjectPublishReply>), AppError> {
    debug!("📝 管理员 {} 发布项目 {:#?}", admin.id, payload);

    let payload = payload.trimmed();
    payload.validate()?;

    let outcome = state.services.projects.publish(&admin, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectPublishReply {
            success: true,
            message: "Project created successfully and notifications sent".to_string(),
            project: outcome.project.into(),
            notifications: outcome.notifications.into(),
        }),
    ))
}

/// 查询项目列表
///
/// 管理员可以看到全部项目；普通用户只能看到开放中的项目，
/// 申请通过后才能看到项目详情。
#[utoipa::path(get,
    path = "/admin-projects",
    tag = "projects",
    responses(
        (status = 200, description = "Visible projects", body = ProjectListReply)
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProjectListReply>, AppError> {
    debug!("🔍 用户 {} 查询项目列表", user.id);

    let projects = state.services.projects.list_visible(&user).await?;

    Ok(Json(ProjectListReply {
        success: true,
        total: projects.len(),
        projects: projects.into_iter().map(Into::into).collect(),
    }))
}

/// 查询指定项目信息
#[utoipa::path(get,
    path = "/admin-projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = ProjectReply),
        (status = 404, description = "Project not found", body = ErrorReply)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectReply>, AppError> {
    debug!("🔍 用户 {} 查询项目 {}", user.id, id);

    let project = state.services.projects.get_visible(&user, &id).await?;

    Ok(Json(ProjectReply {
        success: true,
        message: None,
        project: project.into(),
    }))
}

/// 修改项目状态
///
/// `pending` 的项目可以发布、批准或取消，开放中的项目可以完成或取消，
/// `completed` 和 `cancelled` 是终态。
#[utoipa::path(put,
    path = "/admin-projects/{id}/status",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectStatusRequest,
    responses(
        (status = 200, description = "Project status updated", body = ProjectReply),
        (status = 400, description = "Invalid status or transition", body = ErrorReply),
        (status = 404, description = "Project not found", body = ErrorReply)
    )
)]
pub async fn update_project_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProjectStatusRequest>,
) -> Result<Json<ProjectReply>, AppError> {
    debug!("🔄 管理员 {} 修改项目 {} 状态 {:?}", admin.id, id, payload);

    let project = state
        .services
        .projects
        .update_status(&id, &payload.status, payload.reason)
        .await?;

    Ok(Json(ProjectReply {
        success: true,
        message: Some("Project status updated successfully".to_string()),
        project: project.into(),
    }))
}

/// 发送测试邮件
///
/// 用示例项目给第一个普通用户发送新项目通知，用于检查邮件配置。
#[utoipa::path(get,
    path = "/admin-projects/test-email",
    tag = "projects",
    responses(
        (status = 200, description = "Test email result", body = TestEmailReply),
        (status = 500, description = "Test email failed", body = ErrorReply)
    )
)]
pub async fn send_test_email(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<TestEmailReply>, AppError> {
    debug!("📧 管理员 {} 请求发送测试邮件", admin.id);

    let outcome = state.services.projects.send_test_notification().await?;

    let reply = match outcome.sent_to {
        Some(sent_to) => TestEmailReply {
            success: true,
            message: "Test email sent successfully".to_string(),
            sent_to: Some(sent_to),
            total_users: outcome.total_users,
        },
        None => TestEmailReply {
            success: false,
            message: "No active users found for testing".to_string(),
            sent_to: None,
            total_users: 0,
        },
    };

    Ok(Json(reply))
}
