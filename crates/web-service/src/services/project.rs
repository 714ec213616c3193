//! 项目服务
//!
//! 提供项目发布（含群发通知）、可见性控制以及项目状态管理

use crate::services::error::{ServiceError, ServiceResult};
use crate::services::notifier::Notifier;
use crate::services::user::{not_found_as, UserService};
use database::{
    ApplicationFilter, ApplicationRepositoryTrait, ProjectCreate, ProjectFilter, ProjectInfo, ProjectRepositoryTrait,
    UserInfo,
};
use mail_service::{fan_out, ProjectSummary};
use shared_lib::{ApplicationStatus, ProjectStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// 管理员提交的项目内容，字段已经过校验
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub role: String,
    pub description: String,
    pub timeline: String,
    pub deadline_to_apply: String,
    pub project_details: Option<String>,
}

/// 新项目群发通知的统计结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSummary {
    pub total_users: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub project: ProjectInfo,
    pub notifications: NotificationSummary,
}

/// 测试邮件结果，`sent_to` 为空表示没有可用的收件人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNotificationOutcome {
    pub sent_to: Option<String>,
    pub total_users: usize,
}

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepositoryTrait>,
    applications: Arc<dyn ApplicationRepositoryTrait>,
    users: UserService,
    notifier: Notifier,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectRepositoryTrait>,
        applications: Arc<dyn ApplicationRepositoryTrait>,
        users: UserService,
        notifier: Notifier,
    ) -> Self {
        Self {
            projects,
            applications,
            users,
            notifier,
        }
    }

    /// 发布项目并通知所有普通用户
    ///
    /// 项目写入成功后才开始群发。群发的任何失败都只体现在
    /// [`NotificationSummary`] 中，不会导致发布失败。
    pub async fn publish(&self, admin: &UserInfo, draft: ProjectDraft) -> ServiceResult<PublishOutcome> {
        let project = self
            .projects
            .create_project(ProjectCreate {
                title: draft.title,
                role: draft.role,
                description: draft.description,
                timeline: draft.timeline,
                deadline_to_apply: draft.deadline_to_apply,
                project_details: draft.project_details,
                status: ProjectStatus::Active,
                created_by: admin.name.clone(),
                created_by_email: admin.email.clone(),
            })
            .await?;

        info!("🚀 项目已发布: {} ({})", project.title, project.id);

        let notifications = self.notify_new_project(&project).await;
        Ok(PublishOutcome { project, notifications })
    }

    async fn notify_new_project(&self, project: &ProjectInfo) -> NotificationSummary {
        let recipients = match self.users.publication_recipients().await {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!("❌ 加载通知收件人失败: {}", e);
                return NotificationSummary {
                    error: Some(format!("Failed to load notification recipients: {e}")),
                    ..Default::default()
                };
            }
        };

        if recipients.is_empty() {
            return NotificationSummary::default();
        }

        let summary = summarize(project);
        let templates = self.notifier.templates().clone();
        let result = fan_out(self.notifier.sender(), &recipients, |r| {
            templates.new_project(&r.email, &r.name, &summary)
        })
        .await;

        NotificationSummary {
            total_users: result.total,
            emails_sent: result.sent,
            emails_failed: result.failed,
            error: None,
        }
    }

    /// 查询当前用户可见的项目
    ///
    /// 管理员可以看到全部项目。普通用户只能看到开放中的项目，
    /// 并且只有申请被通过的项目才会返回 `project_details`。
    pub async fn list_visible(&self, viewer: &UserInfo) -> ServiceResult<Vec<ProjectInfo>> {
        if viewer.is_admin() {
            return Ok(self.projects.list_projects(ProjectFilter::default()).await?);
        }

        let projects = self.projects.list_projects(ProjectFilter::open()).await?;
        let approved = self.approved_project_ids(&viewer.id).await?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let unlocked = approved.contains(&project.id);
                redact(project, unlocked)
            })
            .collect())
    }

    pub async fn get_visible(&self, viewer: &UserInfo, id: &str) -> ServiceResult<ProjectInfo> {
        let project = self
            .projects
            .get_project_by_id(id)
            .await?
            .ok_or_else(project_not_found)?;

        if viewer.is_admin() {
            return Ok(project);
        }
        if !project.status.is_open() {
            return Err(project_not_found());
        }

        let unlocked = self
            .applications
            .find_application_by_project_and_user(&project.id, &viewer.id)
            .await?
            .is_some_and(|a| a.status == ApplicationStatus::Approved);

        Ok(redact(project, unlocked))
    }

    /// 修改项目状态
    ///
    /// # 参数
    /// - `status`: 目标状态字符串
    /// - `reason`: 变更原因，空字符串视为未填写
    pub async fn update_status(&self, id: &str, status: &str, reason: Option<String>) -> ServiceResult<ProjectInfo> {
        let target: ProjectStatus = status.parse().map_err(|_| {
            ServiceError::InvalidArgument(
                "Invalid status. Must be pending, active, approved, completed, or cancelled".to_string(),
            )
        })?;

        let project = self
            .projects
            .get_project_by_id(id)
            .await?
            .ok_or_else(project_not_found)?;

        if !project.status.can_transition_to(target) {
            return Err(ServiceError::InvalidState(format!(
                "Cannot change project status from {} to {}",
                project.status, target
            )));
        }

        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        let updated = self
            .projects
            .update_project_status(id, target, reason)
            .await
            .map_err(not_found_as("Project not found"))?;

        info!("🔄 项目 {} 状态: {} -> {}", updated.id, project.status, updated.status);
        Ok(updated)
    }

    /// 用示例项目给第一个收件人发送一封测试邮件
    pub async fn send_test_notification(&self) -> ServiceResult<TestNotificationOutcome> {
        let recipients = self.users.publication_recipients().await?;
        let Some(first) = recipients.first() else {
            return Ok(TestNotificationOutcome {
                sent_to: None,
                total_users: 0,
            });
        };

        let sample = ProjectSummary {
            title: "Test Project".to_string(),
            role: "Test Role".to_string(),
            description: "This is a test project for email verification".to_string(),
            timeline: "1 week".to_string(),
            deadline_to_apply: "2025-12-31".to_string(),
        };
        let message = self.notifier.templates().new_project(&first.email, &first.name, &sample);
        self.notifier.sender().send(message).await?;

        info!("📧 测试邮件已发送至 {}", first.email);
        Ok(TestNotificationOutcome {
            sent_to: Some(first.email.clone()),
            total_users: recipients.len(),
        })
    }

    async fn approved_project_ids(&self, user_id: &str) -> ServiceResult<HashSet<String>> {
        let filter = ApplicationFilter {
            user_id: Some(user_id.to_string()),
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };
        let applications = self.applications.list_applications(filter).await?;
        Ok(applications.into_iter().map(|a| a.project_id).collect())
    }
}

fn project_not_found() -> ServiceError {
    ServiceError::NotFound("Project not found".to_string())
}

fn redact(mut project: ProjectInfo, unlocked: bool) -> ProjectInfo {
    if !unlocked {
        project.project_details = None;
    }
    project
}

fn summarize(project: &ProjectInfo) -> ProjectSummary {
    ProjectSummary {
        title: project.title.clone(),
        role: project.role.clone(),
        description: project.description.clone(),
        timeline: project.timeline.clone(),
        deadline_to_apply: project.deadline_to_apply.clone(),
    }
}
