use thiserror::Error;

/// 邮件发送错误类型
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP传输错误（认证失败、连接失败等）
    #[error("SMTP传输错误: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// 邮箱地址无法解析
    #[error("邮箱地址错误: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// 邮件内容构建失败
    #[error("邮件构建错误: {0}")]
    Build(String),
}
