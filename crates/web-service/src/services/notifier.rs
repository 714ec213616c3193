//! 单封通知邮件的后台发送

use mail_service::{Delivery, EmailMessage, NotificationSender, Templates};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 邮件发送器和模板的组合
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn NotificationSender>,
    templates: Templates,
}

impl Notifier {
    pub fn new(sender: Arc<dyn NotificationSender>, templates: Templates) -> Self {
        Self { sender, templates }
    }

    pub fn sender(&self) -> Arc<dyn NotificationSender> {
        self.sender.clone()
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// 在后台任务中发送邮件，失败只记录日志
    ///
    /// 返回任务句柄，调用方一般直接丢弃
    pub fn dispatch(&self, message: EmailMessage) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let to = message.to.clone();
            match sender.send(message).await {
                Ok(Delivery::Sent { message_id }) => debug!("📧 通知已发送至 {}: {}", to, message_id),
                Ok(Delivery::Skipped) => debug!("📭 邮件功能未启用，未通知 {}", to),
                Err(e) => warn!("❌ 通知 {} 失败: {}", to, e),
            }
        })
    }
}
