//! 当前用户相关接口

use crate::auth::AuthUser;
use crate::models::common::{AppJson, ErrorReply};
use crate::models::err::AppError;
use crate::models::users::{ProfileUpdateRequest, UserReply};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use tracing::debug;
use validator::Validate;

/// 获取当前登录用户
///
/// 首次访问时会根据令牌中的身份信息创建用户，每次访问都会刷新 `lastLogin`。
#[utoipa::path(get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserReply),
        (status = 401, description = "Missing or invalid token", body = ErrorReply)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserReply>, AppError> {
    debug!("👤 获取当前用户: {}", user.id);

    let user = state.services.users.current_user(&user).await?;

    Ok(Json(UserReply {
        success: true,
        message: None,
        user: user.into(),
    }))
}

/// 更新个人资料
///
/// 所有字段都是可选的，未传的字段保持原值。
#[utoipa::path(put,
    path = "/auth/profile",
    tag = "auth",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserReply),
        (status = 400, description = "Validation failed", body = ErrorReply)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<ProfileUpdateRequest>,
) -> Result<Json<UserReply>, AppError> {
    debug!("✏️ 用户 {} 更新资料 {:#?}", user.id, payload);

    let payload = payload.trimmed();
    payload.validate()?;

    let user = state.services.users.update_profile(&user.id, payload.into()).await?;

    Ok(Json(UserReply {
        success: true,
        message: Some("Profile updated successfully".to_string()),
        user: user.into(),
    }))
}
