//! 项目数据库模型
//!
//! 定义项目相关的数据库模型结构体

use chrono::{DateTime, Utc};
use shared_lib::ProjectStatus;

/// 项目信息结构体
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub id: String,
    pub title: String,
    pub role: String,
    pub description: String,
    pub timeline: String,
    /// 申请截止日期（保持用户输入的原始文本）
    pub deadline_to_apply: String,
    /// 详细需求，申请通过前对普通用户隐藏
    pub project_details: Option<String>,
    pub status: ProjectStatus,
    /// 最近一次状态变更的原因，例如取消原因
    pub status_reason: Option<String>,
    pub created_by: String,
    pub created_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 项目创建参数
#[derive(Debug, Clone)]
pub struct ProjectCreate {
    pub title: String,
    pub role: String,
    pub description: String,
    pub timeline: String,
    pub deadline_to_apply: String,
    pub project_details: Option<String>,
    pub status: ProjectStatus,
    pub created_by: String,
    pub created_by_email: String,
}

/// 项目查询条件
///
/// `statuses` 为空表示不过滤状态。结果总是按创建时间倒序。
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub statuses: Vec<ProjectStatus>,
}

impl ProjectFilter {
    /// 只查询开放状态的项目
    pub fn open() -> Self {
        Self {
            statuses: ProjectStatus::ALL.iter().copied().filter(ProjectStatus::is_open).collect(),
        }
    }

    pub fn matches(&self, project: &ProjectInfo) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&project.status)
    }
}
