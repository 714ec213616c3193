//! 邮件通知服务
//!
//! - [`NotificationSender`]：发送单封邮件的抽象，启动时注入SMTP实现或空实现
//! - [`templates`]：各类通知邮件模板
//! - [`fan_out`]：群发，每个收件人单独一个任务，单封失败不影响其他收件人

pub mod error;
pub mod fanout;
pub mod sender;
pub mod templates;

pub use error::MailError;
pub use fanout::{fan_out, FanoutSummary, Recipient};
pub use sender::{Delivery, EmailMessage, NoopSender, NotificationSender, SmtpSender};
pub use templates::{ProjectSummary, Templates};
