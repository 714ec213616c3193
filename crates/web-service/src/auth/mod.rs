//! 身份认证
//!
//! 令牌的签发由外部身份服务完成，这里只负责校验 `Authorization: Bearer <token>`
//! 并得到 [`Identity`]。校验逻辑放在 [`IdentityProvider`] trait 后面，
//! 默认实现是 [`JwtIdentityProvider`]。

pub mod extract;
pub mod jwt;

pub use extract::{AuthUser, RequireAdmin};
pub use jwt::{Claims, JwtIdentityProvider};

use thiserror::Error;

/// 身份服务确认过的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
}

impl Identity {
    /// 显示名称，没有名字时使用邮箱前缀
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.email.split('@').next().filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => prefix.to_string(),
            None => "Unknown".to_string(),
        }
    }
}

/// 认证错误，统一转换为401
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,

    #[error("Invalid Authorization format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),
}

/// 身份校验trait定义
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str, name: Option<&str>) -> Identity {
        Identity {
            uid: "uid-1".to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(identity("alice@example.com", Some(" Alice ")).display_name(), "Alice");
        assert_eq!(identity("alice@example.com", Some("  ")).display_name(), "alice");
        assert_eq!(identity("", None).display_name(), "Unknown");
    }
}
