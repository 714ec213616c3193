//! 用户数据库模型

use chrono::{DateTime, Utc};
use shared_lib::{UserRole, UserStatus};

/// 用户信息结构体
///
/// `id` 与身份提供方返回的用户标识一致
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub job_title: Option<String>,
    pub experience: Option<String>,
    pub tech_stack: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserInfo {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 用户创建参数
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// 个人资料更新参数，`None` 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub experience: Option<String>,
    pub tech_stack: Option<String>,
    pub bio: Option<String>,
}

/// 用户查询条件，结果按创建时间倒序
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn matches(&self, user: &UserInfo) -> bool {
        self.role.map_or(true, |r| r == user.role) && self.status.map_or(true, |s| s == user.status)
    }
}
