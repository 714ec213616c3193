//! 认证提取器
//!
//! 在handler参数里声明 [`AuthUser`] 或 [`RequireAdmin`] 即可完成认证和授权：
//!
//! ```ignore
//! async fn handler(RequireAdmin(admin): RequireAdmin) -> Result<Json<Reply>, AppError> {
//!     // 这里的 admin 一定是管理员
//! }
//! ```

use crate::auth::AuthError;
use crate::models::err::AppError;
use crate::services::ServiceError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use database::UserInfo;
use tracing::debug;

/// 已登录的用户
///
/// 令牌校验通过后根据身份信息查询用户，首次访问时自动创建用户记录。
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserInfo);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedHeader)?;

        let identity = state.identity.verify(token).await?;
        debug!("🔑 令牌校验通过: {}", identity.uid);

        let user = state.services.users.resolve_identity(&identity).await?;
        Ok(AuthUser(user))
    }
}

/// 管理员，以存储中的角色为准，否则返回403
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub UserInfo);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ServiceError::Forbidden("Admin access required".to_string()).into());
        }
        Ok(RequireAdmin(user))
    }
}
