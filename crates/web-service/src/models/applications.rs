use crate::services::ApplicationDraft;
use chrono::{DateTime, Utc};
use database::ApplicationInfo;
use serde::{Deserialize, Serialize};
use shared_lib::ApplicationStatus;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// 提交申请的请求
#[derive(Deserialize, Debug, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCreateRequest {
    #[validate(length(min = 1, message = "Project ID is required"))]
    pub project_id: String,

    #[schema(example = "alice")]
    #[validate(length(min = 2, max = 50, message = "Username must be between 2 and 50 characters"))]
    pub username: String,

    #[schema(example = "alice@example.com")]
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub contact: String,

    #[schema(example = "Rust, PostgreSQL, distributed systems")]
    #[validate(length(min = 10, max = 500, message = "Skills description must be between 10 and 500 characters"))]
    pub skills_description: String,

    #[schema(example = "5 years")]
    #[validate(length(min = 1, message = "Experience is required"))]
    pub experience: String,

    /// 承诺的交付周期（天）
    #[schema(example = 14)]
    #[validate(range(min = 1, message = "Deadline must be a positive number of days"))]
    pub deadline: i32,
}

impl ApplicationCreateRequest {
    pub fn trimmed(self) -> Self {
        Self {
            project_id: self.project_id.trim().to_string(),
            username: self.username.trim().to_string(),
            contact: self.contact.trim().to_string(),
            skills_description: self.skills_description.trim().to_string(),
            experience: self.experience.trim().to_string(),
            deadline: self.deadline,
        }
    }
}

impl From<ApplicationCreateRequest> for ApplicationDraft {
    fn from(req: ApplicationCreateRequest) -> Self {
        ApplicationDraft {
            project_id: req.project_id,
            username: req.username,
            contact: req.contact,
            skills_description: req.skills_description,
            experience: req.experience,
            deadline_days: req.deadline,
        }
    }
}

/// 审批请求，`status` 只能是 `approved` 或 `rejected`
#[derive(Deserialize, Debug, ToSchema)]
pub struct ApplicationStatusRequest {
    #[schema(example = "approved")]
    pub status: String,
}

/// 申请列表查询参数
#[derive(Deserialize, Debug, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ApplicationQuery {
    /// 只查询该项目的申请
    pub project_id: Option<String>,
}

/// 申请信息
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDto {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub username: String,
    pub contact: String,
    pub skills_description: String,
    pub experience: String,
    /// 承诺的交付周期（天）
    pub deadline: i32,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationInfo> for ApplicationDto {
    fn from(a: ApplicationInfo) -> Self {
        Self {
            id: a.id,
            project_id: a.project_id,
            project_name: a.project_name,
            user_id: a.user_id,
            user_name: a.user_name,
            user_email: a.user_email,
            username: a.username,
            contact: a.contact,
            skills_description: a.skills_description,
            experience: a.experience,
            deadline: a.deadline_days,
            status: a.status,
            applied_at: a.applied_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApplicationReply {
    pub success: bool,
    pub message: String,
    pub application: ApplicationDto,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApplicationListReply {
    pub success: bool,
    pub applications: Vec<ApplicationDto>,
}
