//! 服务层测试工具

use crate::auth::Identity;
use crate::services::Services;
use database::{Repositories, UserInfo};
use mail_service::{Delivery, EmailMessage, MailError, NotificationSender};
use shared_lib::AppConfig;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 记录所有邮件，对 `failing` 中的地址返回错误
#[derive(Default)]
pub(crate) struct RecordingSender {
    pub failing: HashSet<String>,
    pub messages: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    pub fn failing(emails: &[&str]) -> Self {
        Self {
            failing: emails.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// 等待后台任务发出主题包含 `subject` 的邮件
    pub async fn wait_for_subject(&self, subject: &str) -> Option<EmailMessage> {
        for _ in 0..200 {
            if let Some(found) = self.sent().into_iter().find(|m| m.subject.contains(subject)) {
                return Some(found);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

#[async_trait::async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: EmailMessage) -> Result<Delivery, MailError> {
        if self.failing.contains(&message.to) {
            return Err(MailError::Build("mailbox unavailable".to_string()));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(Delivery::Sent {
            message_id: format!("<{}>", message.to),
        })
    }
}

pub(crate) struct Fixture {
    pub services: Services,
    pub repositories: Repositories,
    pub sender: Arc<RecordingSender>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_sender(RecordingSender::default())
    }

    pub fn with_sender(sender: RecordingSender) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "AUTH_JWT_SECRET" => Some("test-secret".to_string()),
            "ADMIN_EMAILS" => Some("admin@example.com".to_string()),
            "FRONTEND_URL" => Some("http://localhost:3000".to_string()),
            _ => None,
        })
        .unwrap();

        let repositories = Repositories::in_memory();
        let sender = Arc::new(sender);
        let services = Services::new(&repositories, sender.clone(), &config);
        Self {
            services,
            repositories,
            sender,
        }
    }

    pub async fn admin(&self) -> UserInfo {
        self.user_with("admin-1", "admin@example.com", "Admin").await
    }

    pub async fn user(&self, uid: &str) -> UserInfo {
        self.user_with(uid, &format!("{uid}@example.com"), uid).await
    }

    pub async fn user_with(&self, uid: &str, email: &str, name: &str) -> UserInfo {
        let identity = Identity {
            uid: uid.to_string(),
            email: email.to_string(),
            name: Some(name.to_string()),
        };
        self.services.users.resolve_identity(&identity).await.unwrap()
    }
}
