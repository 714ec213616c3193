//! 申请服务
//!
//! 申请的提交、查询和审批。审批通过或拒绝后会在后台给申请人发送邮件。

use crate::services::error::{ServiceError, ServiceResult};
use crate::services::notifier::Notifier;
use database::{
    ApplicationCreate, ApplicationFilter, ApplicationInfo, ApplicationRepositoryTrait, DatabaseError,
    ProjectRepositoryTrait, UserInfo,
};
use shared_lib::ApplicationStatus;
use std::sync::Arc;
use tracing::{debug, info};

const ALREADY_APPLIED: &str = "You have already applied to this project";

/// 申请表内容，字段已经过校验
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub project_id: String,
    pub username: String,
    pub contact: String,
    pub skills_description: String,
    pub experience: String,
    pub deadline_days: i32,
}

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepositoryTrait>,
    projects: Arc<dyn ProjectRepositoryTrait>,
    notifier: Notifier,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepositoryTrait>,
        projects: Arc<dyn ProjectRepositoryTrait>,
        notifier: Notifier,
    ) -> Self {
        Self {
            applications,
            projects,
            notifier,
        }
    }

    /// 提交申请
    ///
    /// 项目必须存在并且处于开放状态。重复申请的最终判断依赖存储层唯一约束，
    /// 这里的预先查询只是为了尽早返回。
    pub async fn submit(&self, applicant: &UserInfo, draft: ApplicationDraft) -> ServiceResult<ApplicationInfo> {
        let project = self
            .projects
            .get_project_by_id(&draft.project_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        if !project.status.is_open() {
            return Err(ServiceError::InvalidState(format!(
                "Cannot apply to a project that is {}",
                project.status
            )));
        }

        if self
            .applications
            .find_application_by_project_and_user(&project.id, &applicant.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(ALREADY_APPLIED.to_string()));
        }

        let application = self
            .applications
            .create_application(ApplicationCreate {
                project_id: project.id,
                project_name: project.title,
                user_id: applicant.id.clone(),
                user_name: applicant.name.clone(),
                user_email: applicant.email.clone(),
                username: draft.username,
                contact: draft.contact,
                skills_description: draft.skills_description,
                experience: draft.experience,
                deadline_days: draft.deadline_days,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => ServiceError::Conflict(ALREADY_APPLIED.to_string()),
                other => other.into(),
            })?;

        info!("📝 用户 {} 申请项目 {}", application.user_id, application.project_id);
        Ok(application)
    }

    pub async fn list_mine(&self, user_id: &str) -> ServiceResult<Vec<ApplicationInfo>> {
        let filter = ApplicationFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        };
        Ok(self.applications.list_applications(filter).await?)
    }

    /// 管理员查询申请，可按项目过滤
    pub async fn list(&self, project_id: Option<String>) -> ServiceResult<Vec<ApplicationInfo>> {
        let filter = ApplicationFilter {
            project_id: project_id.filter(|id| !id.trim().is_empty()),
            ..Default::default()
        };
        Ok(self.applications.list_applications(filter).await?)
    }

    /// 把字符串解析为审批结果，只接受 `approved` / `rejected`
    pub fn parse_decision(status: &str) -> ServiceResult<ApplicationStatus> {
        status
            .parse::<ApplicationStatus>()
            .ok()
            .filter(ApplicationStatus::is_decision)
            .ok_or_else(|| ServiceError::InvalidArgument("Invalid status. Must be approved or rejected".to_string()))
    }

    /// 审批申请
    ///
    /// 只有 `pending` 状态的申请可以审批，更新使用compare-and-set，
    /// 并发审批时只有一个请求会成功。更新成功后在后台发送一封通知邮件。
    pub async fn transition(&self, id: &str, target: ApplicationStatus) -> ServiceResult<ApplicationInfo> {
        if !target.is_decision() {
            return Err(ServiceError::InvalidArgument(
                "Invalid status. Must be approved or rejected".to_string(),
            ));
        }

        let current = self
            .applications
            .find_application_by_id(id)
            .await?
            .ok_or_else(application_not_found)?;

        debug!("🔄 审批申请 {}: {} -> {}", id, current.status, target);

        if current.status != ApplicationStatus::Pending {
            return Err(already_decided(current.status));
        }

        let updated = match self
            .applications
            .transition_application_status(id, ApplicationStatus::Pending, target)
            .await?
        {
            Some(updated) => updated,
            // 并发审批：重新读取以确定失败原因
            None => {
                return match self.applications.find_application_by_id(id).await? {
                    Some(latest) => Err(already_decided(latest.status)),
                    None => Err(application_not_found()),
                };
            }
        };

        info!("✅ 申请 {} 已{}", updated.id, updated.status);
        self.notify_decision(&updated);
        Ok(updated)
    }

    fn notify_decision(&self, application: &ApplicationInfo) {
        let templates = self.notifier.templates();
        let message = match application.status {
            ApplicationStatus::Approved => templates.application_approved(
                &application.user_email,
                &application.user_name,
                &application.project_name,
            ),
            ApplicationStatus::Rejected => templates.application_rejected(
                &application.user_email,
                &application.user_name,
                &application.project_name,
            ),
            ApplicationStatus::Pending => return,
        };
        self.notifier.dispatch(message);
    }
}

fn application_not_found() -> ServiceError {
    ServiceError::NotFound("Application not found".to_string())
}

fn already_decided(status: ApplicationStatus) -> ServiceError {
    ServiceError::InvalidState(format!("Application has already been {status}"))
}
