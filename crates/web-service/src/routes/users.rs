//! 用户管理接口（管理员）

use crate::auth::RequireAdmin;
use crate::models::common::{AppJson, ErrorReply, MessageReply};
use crate::models::err::AppError;
use crate::models::users::{UserListReply, UserReply, UserStatusRequest};
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

/// 全部普通用户，按注册时间倒序
#[utoipa::path(get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users", body = UserListReply),
        (status = 403, description = "Admin access required", body = ErrorReply)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<UserListReply>, AppError> {
    debug!("🔍 查询用户列表");

    let users = state.services.users.list_users().await?;

    Ok(Json(UserListReply {
        success: true,
        total: users.len(),
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// 可接收新项目通知的用户
///
/// 普通用户、状态为 `active` 且邮箱不为空。
#[utoipa::path(get,
    path = "/users/notify/job",
    tag = "users",
    responses(
        (status = 200, description = "Notification recipients", body = UserListReply)
    )
)]
pub async fn notification_recipients(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<UserListReply>, AppError> {
    debug!("🔍 查询通知收件人");

    let users = state.services.users.notification_recipients().await?;

    Ok(Json(UserListReply {
        success: true,
        total: users.len(),
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserReply),
        (status = 404, description = "User not found", body = ErrorReply)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserReply>, AppError> {
    debug!("🔍 查询用户 {}", id);

    let user = state.services.users.get_user(&id).await?;

    Ok(Json(UserReply {
        success: true,
        message: None,
        user: user.into(),
    }))
}

/// 修改用户状态
#[utoipa::path(put,
    path = "/users/{id}/status",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "User status updated", body = MessageReply),
        (status = 400, description = "Invalid status", body = ErrorReply),
        (status = 404, description = "User not found", body = ErrorReply)
    )
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserStatusRequest>,
) -> Result<Json<MessageReply>, AppError> {
    debug!("🔄 管理员 {} 修改用户 {} 状态 {:?}", admin.id, id, payload);

    state.services.users.update_status(&id, &payload.status).await?;

    Ok(Json(MessageReply::ok("User status updated successfully")))
}

#[utoipa::path(delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageReply),
        (status = 404, description = "User not found", body = ErrorReply)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<MessageReply>, AppError> {
    debug!("🗑️ 管理员 {} 删除用户 {}", admin.id, id);

    state.services.users.delete_user(&id).await?;

    Ok(Json(MessageReply::ok("User deleted successfully")))
}
