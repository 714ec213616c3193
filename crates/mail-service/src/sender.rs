//! 邮件发送器

use crate::MailError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use shared_lib::MailConfig;
use tracing::{debug, info};

/// 一封待发送的HTML邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// 已交给SMTP服务器
    Sent { message_id: String },
    /// 邮件功能未启用，没有实际发送
    Skipped,
}

/// 邮件发送器trait定义
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync + 'static {
    async fn send(&self, message: EmailMessage) -> Result<Delivery, MailError>;

    /// 是否会真正发送邮件
    fn is_enabled(&self) -> bool {
        true
    }
}

/// 基于 `lettre` 的SMTP发送器
///
/// 传输层在启动时创建一次，之后所有请求共用。
#[derive(Debug)]
pub struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpSender {
    /// 根据邮件配置创建发送器
    ///
    /// 只会校验发件地址和SMTP主机，不会建立连接。
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from = Mailbox::new(Some(config.from_name.clone()), config.username.parse()?);

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        info!("📧 SMTP发送器已创建: {} (发件人 {})", config.smtp_host, from);
        Ok(Self { mailer, from })
    }
}

#[async_trait::async_trait]
impl NotificationSender for SmtpSender {
    async fn send(&self, message: EmailMessage) -> Result<Delivery, MailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(message.to.parse()?)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let response = self.mailer.send(email).await?;
        let message_id = response.message().collect::<Vec<_>>().join(" ");

        debug!("✅ 邮件已发送至 {}: {}", message.to, message_id);
        Ok(Delivery::Sent { message_id })
    }
}

/// 未配置邮箱账号时使用的发送器，只记录日志
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSender;

#[async_trait::async_trait]
impl NotificationSender for NoopSender {
    async fn send(&self, message: EmailMessage) -> Result<Delivery, MailError> {
        debug!("📭 邮件功能未启用，跳过发送: {} -> {}", message.subject, message.to);
        Ok(Delivery::Skipped)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(username: &str) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            username: username.to_string(),
            password: "app-password".to_string(),
            from_name: "Projectify".to_string(),
        }
    }

    #[tokio::test]
    async fn noop_sender_skips() {
        let sender = NoopSender;
        let delivery = sender
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "hello".to_string(),
                html: "<p>hi</p>".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(delivery, Delivery::Skipped);
        assert!(!sender.is_enabled());
    }

    #[tokio::test]
    async fn smtp_sender_uses_display_name() {
        let sender = SmtpSender::new(&config("team@example.com")).unwrap();
        assert_eq!(sender.from.to_string(), "Projectify <team@example.com>");
        assert!(sender.is_enabled());
    }

    #[test]
    fn smtp_sender_rejects_invalid_username() {
        assert_matches!(SmtpSender::new(&config("not-an-email")), Err(MailError::Address(_)));
    }
}
