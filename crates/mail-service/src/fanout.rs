//! 群发通知
//!
//! 每个收件人的发送都在独立的tokio任务中执行，等待全部完成后统计结果。
//! 单个任务返回错误或者panic都只计为一次失败。

use crate::{Delivery, EmailMessage, NotificationSender};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// 收件人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// 群发结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    /// 发送器未启用而跳过的数量
    pub skipped: usize,
}

/// 向全部收件人发送邮件
///
/// # 参数
/// - `sender`: 邮件发送器
/// - `recipients`: 收件人列表
/// - `compose`: 根据收件人生成邮件内容
pub async fn fan_out<F>(sender: Arc<dyn NotificationSender>, recipients: &[Recipient], compose: F) -> FanoutSummary
where
    F: Fn(&Recipient) -> EmailMessage,
{
    info!("📧 开始群发通知，共 {} 个收件人", recipients.len());

    let tasks = recipients.iter().map(|recipient| {
        let sender = sender.clone();
        let message = compose(recipient);
        let email = recipient.email.clone();
        tokio::spawn(async move { (email, sender.send(message).await) })
    });

    let mut summary = FanoutSummary {
        total: recipients.len(),
        ..Default::default()
    };

    for result in join_all(tasks).await {
        match result {
            Ok((_, Ok(Delivery::Sent { .. }))) => summary.sent += 1,
            Ok((_, Ok(Delivery::Skipped))) => summary.skipped += 1,
            Ok((email, Err(e))) => {
                warn!("❌ 发送通知到 {} 失败: {}", email, e);
                summary.failed += 1;
            }
            Err(e) => {
                warn!("❌ 发送任务异常退出: {}", e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "📧 群发完成: 成功 {}, 失败 {}, 跳过 {}",
        summary.sent, summary.failed, summary.skipped
    );
    summary
}
