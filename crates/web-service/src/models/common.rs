use crate::models::err::AppError;
use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// json请求体提取器
///
/// 与 [`axum::Json`] 相同，但是请求体缺少字段、类型错误或者不是json时，
/// 返回统一格式的400错误，而不是axum默认的纯文本422。
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// 字段校验错误
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "skillsDescription")]
    pub field: String,

    #[schema(example = "Skills description must be between 10 and 500 characters")]
    pub message: String,
}

/// 统一的失败返回格式
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorReply {
    /// 固定为`false`
    pub success: bool,

    pub message: String,

    /// 诊断信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// 参数校验失败时的字段错误
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            errors: None,
        }
    }
}

/// 只包含提示信息的成功返回
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageReply {
    pub success: bool,

    #[schema(example = "User deleted successfully")]
    pub message: String,
}

impl MessageReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// 健康检查结果
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReply {
    pub success: bool,

    #[schema(example = "✅ Server is running and healthy")]
    pub message: String,

    /// 进程运行时长（秒）
    #[schema(example = 12.5)]
    pub uptime: f64,

    /// RFC 3339格式的当前时间
    pub timestamp: String,

    #[schema(example = "development")]
    pub environment: String,

    /// 当前使用的存储：`postgres` 或 `memory`
    #[schema(example = "postgres")]
    pub store: String,
}

/// 根路径欢迎信息
#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeReply {
    pub success: bool,

    #[schema(example = "🚀 Welcome to Projectify Backend API!")]
    pub message: String,

    #[schema(example = "0.1.0")]
    pub version: String,

    pub uptime: f64,
    pub timestamp: String,

    /// 接口分组和对应的路径前缀
    pub endpoints: BTreeMap<String, String>,
}

/// 订阅参数，`projectId` 只对 `applications` 订阅有效
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubscriptionQuery {
    pub project_id: Option<String>,
}
