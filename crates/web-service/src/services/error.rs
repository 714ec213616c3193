use database::DatabaseError;
use mail_service::MailError;
use thiserror::Error;

/// 服务层错误类型
///
/// 每种错误对应一种HTTP状态码，转换规则见 [`crate::models::err::AppError`]
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// 当前状态不允许该操作
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Conflict(String),

    /// 参数不合法
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Forbidden(String),

    /// 存储层错误
    #[error("存储服务错误: {0}")]
    Dependency(#[source] DatabaseError),

    /// 同步发送邮件失败，只有测试邮件接口会返回
    #[error("邮件发送失败: {0}")]
    Notification(#[from] MailError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::UniqueViolation(constraint) => {
                ServiceError::Conflict(format!("记录已存在 ({constraint})"))
            }
            other => ServiceError::Dependency(other),
        }
    }
}

/// 服务层结果类型
pub type ServiceResult<T> = Result<T, ServiceError>;
