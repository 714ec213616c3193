use chrono::{DateTime, Utc};
use database::{UserInfo, UserProfileUpdate};
use serde::{Deserialize, Serialize};
use shared_lib::{UserRole, UserStatus};
use utoipa::ToSchema;
use validator::Validate;

/// 用户信息
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserInfo> for UserDto {
    fn from(u: UserInfo) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            status: u.status,
            job_title: u.job_title,
            experience: u.experience,
            tech_stack: u.tech_stack,
            bio: u.bio,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login: u.last_login,
        }
    }
}

/// 更新个人资料，未传的字段保持不变
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[schema(example = "Alice")]
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: Option<String>,

    #[schema(example = "Backend Engineer")]
    pub job_title: Option<String>,

    #[schema(example = "5 years")]
    pub experience: Option<String>,

    #[schema(example = "Rust, Go, PostgreSQL")]
    pub tech_stack: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,
}

impl ProfileUpdateRequest {
    pub fn trimmed(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            job_title: trim(self.job_title),
            experience: trim(self.experience),
            tech_stack: trim(self.tech_stack),
            bio: trim(self.bio),
        }
    }
}

impl From<ProfileUpdateRequest> for UserProfileUpdate {
    fn from(req: ProfileUpdateRequest) -> Self {
        UserProfileUpdate {
            name: req.name,
            job_title: req.job_title,
            experience: req.experience,
            tech_stack: req.tech_stack,
            bio: req.bio,
        }
    }
}

/// 修改用户状态，`status` 只能是 `active` / `inactive` / `pending`
#[derive(Deserialize, Debug, ToSchema)]
pub struct UserStatusRequest {
    #[schema(example = "inactive")]
    pub status: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserReply {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub user: UserDto,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserListReply {
    pub success: bool,
    pub users: Vec<UserDto>,
    pub total: usize,
}
