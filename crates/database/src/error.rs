use thiserror::Error;

/// 数据库操作错误类型
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLX 错误
    #[error("数据库操作错误: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// 连接错误
    #[error("数据库连接错误: {0}")]
    ConnectionError(String),

    /// 迁移错误
    #[error("数据库迁移错误: {0}")]
    MigrationError(String),

    /// 记录不存在
    #[error("记录不存在: {0}")]
    NotFound(String),

    /// 违反唯一约束
    #[error("违反唯一约束: {0}")]
    UniqueViolation(String),

    /// 数据库中的值无法转换为业务类型
    #[error("数据解析错误: {0}")]
    DecodeError(String),
}

impl DatabaseError {
    /// 创建连接错误
    pub fn connection<T: ToString>(msg: T) -> Self {
        Self::ConnectionError(msg.to_string())
    }

    /// 创建迁移错误
    pub fn migration<T: ToString>(msg: T) -> Self {
        Self::MigrationError(msg.to_string())
    }

    pub fn not_found<T: ToString>(msg: T) -> Self {
        Self::NotFound(msg.to_string())
    }

    pub fn decode<T: ToString>(msg: T) -> Self {
        Self::DecodeError(msg.to_string())
    }

    /// 将sqlx错误中的唯一约束冲突转换为 [`DatabaseError::UniqueViolation`]
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(db_err.constraint().unwrap_or("unique").to_string())
            }
            _ => Self::SqlxError(err),
        }
    }
}
