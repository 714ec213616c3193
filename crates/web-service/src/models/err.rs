use crate::auth::AuthError;
use crate::models::common::{ErrorReply, FieldError};
use crate::services::ServiceError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// 使用 [`thiserror`] 定义错误类型
/// 方便根据类型转换为相应的http错误码
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据验证错误，这种错误通常都是用户参数不正确导致的，所以转换为400
    #[error(transparent)]
    ValidationFailed(#[from] ValidationErrors),

    /// 请求体无法解析为目标类型，同样属于参数错误
    #[error(transparent)]
    JsonRejected(#[from] JsonRejection),

    /// 未登录或令牌无效
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// 业务逻辑错误
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// 路由不存在
    #[error("Route not found: {0}")]
    RouteNotFound(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) | AppError::JsonRejected(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Service(err) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvalidState(_) | ServiceError::InvalidArgument(_) | ServiceError::Conflict(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Dependency(_) | ServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Tell axum how to convert `AppError` into a response.
///
/// 所有错误都返回 `{success: false, message, error?, errors?}` 格式的json。
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::ValidationFailed(errors) => ErrorReply {
                errors: Some(field_errors(&errors)),
                ..ErrorReply::new("Validation failed")
            },
            AppError::JsonRejected(rejection) => ErrorReply {
                error: Some(rejection.body_text()),
                ..ErrorReply::new("Invalid request body")
            },
            AppError::Unauthorized(err) => ErrorReply::new(err.to_string()),
            AppError::RouteNotFound(path) => ErrorReply {
                error: Some(path),
                ..ErrorReply::new("❌ Route not found")
            },
            AppError::Service(ServiceError::Dependency(err)) => {
                error!("🔥 存储服务错误: {}", err);
                ErrorReply {
                    error: Some(err.to_string()),
                    ..ErrorReply::new("Internal server error")
                }
            }
            AppError::Service(ServiceError::Notification(err)) => {
                error!("🔥 邮件发送失败: {}", err);
                ErrorReply {
                    error: Some(err.to_string()),
                    ..ErrorReply::new("Test email failed")
                }
            }
            AppError::Service(err) => ErrorReply::new(err.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// 将校验错误展开为按字段排序的列表，字段名使用camelCase
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

fn camel_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            result.extend(c.to_uppercase());
            upper = false;
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 10, message = "Skills description must be between 10 and 500 characters"))]
        skills_description: String,
        #[validate(range(min = 1))]
        deadline: i32,
    }

    #[test]
    fn validation_errors_use_camel_case_fields() {
        let errors = Sample {
            skills_description: "short".to_string(),
            deadline: 0,
        }
        .validate()
        .unwrap_err();

        let fields = field_errors(&errors);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "deadline");
        assert_eq!(fields[0].message, "range");
        assert_eq!(fields[1].field, "skillsDescription");
        assert_eq!(
            fields[1].message,
            "Skills description must be between 10 and 500 characters"
        );
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::InvalidState("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
        assert_eq!(
            AppError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
