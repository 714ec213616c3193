//! HS256 JWT 校验

use crate::auth::{AuthError, Identity, IdentityProvider};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// 身份令牌中的声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户唯一标识
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// 过期时间（Unix时间戳，秒）
    pub exp: i64,
}

/// 使用共享密钥校验HS256令牌
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            // 默认HS256，并校验exp
            validation: Validation::default(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("missing subject".to_string()));
        }

        Ok(Identity {
            uid: claims.sub,
            email: claims.email.trim().to_string(),
            name: claims.name,
        })
    }
}
