use crate::services::{NotificationSummary, ProjectDraft};
use chrono::{DateTime, Utc};
use database::ProjectInfo;
use serde::{Deserialize, Serialize};
use shared_lib::ProjectStatus;
use utoipa::ToSchema;
use validator::Validate;

/// 管理员发布项目的请求
///
/// 所有字符串在校验前都会去掉首尾空白，见 [`ProjectCreateRequest::trimmed`]
#[derive(Deserialize, Debug, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateRequest {
    #[schema(example = "API Gateway")]
    #[validate(length(min = 3, max = 100, message = "Project title must be between 3 and 100 characters"))]
    pub title: String,

    #[schema(example = "Backend Engineer")]
    #[validate(length(min = 2, max = 100, message = "Role must be between 2 and 100 characters"))]
    pub role: String,

    #[schema(example = "Build a high performance API gateway")]
    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: String,

    #[schema(example = "6 weeks")]
    #[validate(length(min = 2, max = 100, message = "Timeline must be between 2 and 100 characters"))]
    pub timeline: String,

    #[schema(example = "2025-12-31")]
    #[validate(length(min = 1, message = "Deadline to apply is required"))]
    pub deadline_to_apply: String,

    /// 详细需求，只有申请通过的用户可以看到
    #[validate(length(min = 10, max = 2000, message = "Project details must be between 10 and 2000 characters"))]
    pub project_details: Option<String>,
}

impl ProjectCreateRequest {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            role: self.role.trim().to_string(),
            description: self.description.trim().to_string(),
            timeline: self.timeline.trim().to_string(),
            deadline_to_apply: self.deadline_to_apply.trim().to_string(),
            // 空白详情视为未填写
            project_details: self
                .project_details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}

impl From<ProjectCreateRequest> for ProjectDraft {
    fn from(req: ProjectCreateRequest) -> Self {
        ProjectDraft {
            title: req.title,
            role: req.role,
            description: req.description,
            timeline: req.timeline,
            deadline_to_apply: req.deadline_to_apply,
            project_details: req.project_details,
        }
    }
}

/// 修改项目状态的请求
#[derive(Deserialize, Debug, ToSchema)]
pub struct ProjectStatusRequest {
    #[schema(example = "cancelled")]
    pub status: String,

    /// 变更原因，例如取消原因
    pub reason: Option<String>,
}

/// 项目信息
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: String,
    pub title: String,
    pub role: String,
    pub description: String,
    pub timeline: String,
    pub deadline_to_apply: String,

    /// 普通用户申请通过前不返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_details: Option<String>,

    pub status: ProjectStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,

    pub created_by: String,
    pub created_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectInfo> for ProjectDto {
    fn from(p: ProjectInfo) -> Self {
        Self {
            id: p.id,
            title: p.title,
            role: p.role,
            description: p.description,
            timeline: p.timeline,
            deadline_to_apply: p.deadline_to_apply,
            project_details: p.project_details,
            status: p.status,
            status_reason: p.status_reason,
            created_by: p.created_by,
            created_by_email: p.created_by_email,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// 群发通知统计
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsDto {
    #[schema(example = 12)]
    pub total_users: usize,

    #[schema(example = 11)]
    pub emails_sent: usize,

    #[schema(example = 1)]
    pub emails_failed: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<NotificationSummary> for NotificationsDto {
    fn from(s: NotificationSummary) -> Self {
        Self {
            total_users: s.total_users,
            emails_sent: s.emails_sent,
            emails_failed: s.emails_failed,
            error: s.error,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProjectPublishReply {
    pub success: bool,
    pub message: String,
    pub project: ProjectDto,
    pub notifications: NotificationsDto,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProjectListReply {
    pub success: bool,
    pub projects: Vec<ProjectDto>,
    pub total: usize,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProjectReply {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub project: ProjectDto,
}

/// 测试邮件结果
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailReply {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,

    pub total_users: usize,
}
