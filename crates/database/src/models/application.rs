//! 申请数据库模型

use chrono::{DateTime, Utc};
use shared_lib::ApplicationStatus;

/// 申请信息结构体
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationInfo {
    pub id: String,
    pub project_id: String,
    /// 申请时的项目标题
    pub project_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    /// 申请表中填写的用户名
    pub username: String,
    pub contact: String,
    pub skills_description: String,
    pub experience: String,
    /// 申请人承诺的交付周期（天）
    pub deadline_days: i32,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 申请创建参数
#[derive(Debug, Clone)]
pub struct ApplicationCreate {
    pub project_id: String,
    pub project_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub username: String,
    pub contact: String,
    pub skills_description: String,
    pub experience: String,
    pub deadline_days: i32,
}

/// 申请查询条件，结果按申请时间倒序
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub project_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<ApplicationStatus>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &ApplicationInfo) -> bool {
        self.project_id.as_ref().map_or(true, |id| *id == application.project_id)
            && self.user_id.as_ref().map_or(true, |id| *id == application.user_id)
            && self.status.map_or(true, |s| s == application.status)
    }
}
