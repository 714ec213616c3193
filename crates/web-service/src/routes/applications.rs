//! 申请相关接口
//!

use crate::auth::{AuthUser, RequireAdmin};
use crate::models::applications::{
    ApplicationCreateRequest, ApplicationListReply, ApplicationQuery, ApplicationReply, ApplicationStatusRequest,
};
use crate::models::common::{AppJson, ErrorReply};
use crate::models::err::AppError;
use crate::services::ApplicationService;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shared_lib::ApplicationStatus;
use tracing::debug;
use validator::Validate;

/// 提交项目申请
///
/// 项目必须处于开放状态，同一用户对同一项目只能申请一次。
#[utoipa::path(post,
    path = "/applications",
    tag = "applications",
    request_body = ApplicationCreateRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationReply),
        (status = 400, description = "Validation failed, project not open or already applied", body = ErrorReply),
        (status = 404, description = "Project not found", body = ErrorReply)
    )
)]
pub async fn submit_application(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<ApplicationCreateRequest>,
) -> Result<(StatusCode, Json<ApplicationReply>), AppError> {
    debug!("📝 用户 {} 提交申请 {:#?}", user.id, payload);

    let payload = payload.trimmed();
    payload.validate()?;

    let application = state.services.applications.submit(&user, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationReply {
            success: true,
            message: "Application submitted successfully".to_string(),
            application: application.into(),
        }),
    ))
}

/// 当前用户的申请，按申请时间倒序
#[utoipa::path(get,
    path = "/applications/my",
    tag = "applications",
    responses(
        (status = 200, description = "Applications of current user", body = ApplicationListReply)
    )
)]
pub async fn my_applications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApplicationListReply>, AppError> {
    debug!("🔍 查询用户 {} 的申请", user.id);

    let applications = state.services.applications.list_mine(&user.id).await?;

    Ok(Json(ApplicationListReply {
        success: true,
        applications: applications.into_iter().map(Into::into).collect(),
    }))
}

/// 查询全部申请（管理员）
#[utoipa::path(get,
    path = "/applications",
    tag = "applications",
    params(ApplicationQuery),
    responses(
        (status = 200, description = "All applications", body = ApplicationListReply),
        (status = 403, description = "Admin access required", body = ErrorReply)
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<ApplicationListReply>, AppError> {
    debug!("🔍 查询申请列表 {:?}", query);

    let applications = state.services.applications.list(query.project_id).await?;

    Ok(Json(ApplicationListReply {
        success: true,
        applications: applications.into_iter().map(Into::into).collect(),
    }))
}

/// 通过申请
#[utoipa::path(put,
    path = "/applications/{id}/approve",
    tag = "applications",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application approved", body = ApplicationReply),
        (status = 400, description = "Application already decided", body = ErrorReply),
        (status = 404, description = "Application not found", body = ErrorReply)
    )
)]
pub async fn approve_application(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApplicationReply>, AppError> {
    debug!("✅ 管理员 {} 通过申请 {}", admin.id, id);
    decide(&state, &id, ApplicationStatus::Approved).await
}

/// 拒绝申请
#[utoipa::path(put,
    path = "/applications/{id}/reject",
    tag = "applications",
    params(("id" = String, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application rejected", body = ApplicationReply),
        (status = 400, description = "Application already decided", body = ErrorReply),
        (status = 404, description = "Application not found", body = ErrorReply)
    )
)]
pub async fn reject_application(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApplicationReply>, AppError> {
    debug!("❌ 管理员 {} 拒绝申请 {}", admin.id, id);
    decide(&state, &id, ApplicationStatus::Rejected).await
}

/// 按请求体中的状态审批申请
///
/// `status` 只能是 `approved` 或 `rejected`，其它值返回400且不修改数据。
#[utoipa::path(put,
    path = "/applications/{id}/status",
    tag = "applications",
    params(("id" = String, Path, description = "Application id")),
    request_body = ApplicationStatusRequest,
    responses(
        (status = 200, description = "Application updated", body = ApplicationReply),
        (status = 400, description = "Invalid status or application already decided", body = ErrorReply),
        (status = 404, description = "Application not found", body = ErrorReply)
    )
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ApplicationStatusRequest>,
) -> Result<Json<ApplicationReply>, AppError> {
    debug!("🔄 管理员 {} 修改申请 {} 状态 {:?}", admin.id, id, payload);

    let target = ApplicationService::parse_decision(&payload.status)?;
    decide(&state, &id, target).await
}

async fn decide(state: &AppState, id: &str, target: ApplicationStatus) -> Result<Json<ApplicationReply>, AppError> {
    let application = state.services.applications.transition(id, target).await?;

    Ok(Json(ApplicationReply {
        success: true,
        message: format!("Application {} successfully", application.status),
        application: application.into(),
    }))
}
