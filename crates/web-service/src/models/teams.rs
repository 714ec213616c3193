use crate::services::TeamDraft;
use chrono::{DateTime, Utc};
use database::{TeamInfo, TeamMember};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 团队成员
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDto {
    #[schema(example = "uid-42")]
    pub user_id: String,

    #[schema(example = "Alice")]
    pub user_name: String,
}

/// 创建团队的请求
#[derive(Deserialize, Debug, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamCreateRequest {
    #[schema(example = "Rustaceans")]
    pub team_name: String,

    pub members: Vec<TeamMemberDto>,

    /// 人数上限，默认5人
    #[schema(example = 5)]
    #[validate(range(min = 1, message = "Max members must be at least 1"))]
    pub max_members: Option<usize>,
}

impl From<TeamCreateRequest> for TeamDraft {
    fn from(req: TeamCreateRequest) -> Self {
        TeamDraft {
            team_name: req.team_name,
            members: req
                .members
                .into_iter()
                .map(|m| TeamMember {
                    user_id: m.user_id,
                    user_name: m.user_name,
                })
                .collect(),
            max_members: req.max_members,
        }
    }
}

/// 团队信息
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: String,
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<TeamInfo> for TeamDto {
    fn from(t: TeamInfo) -> Self {
        Self {
            id: t.id,
            team_name: t.team_name,
            members: t
                .members
                .into_iter()
                .map(|m| TeamMemberDto {
                    user_id: m.user_id,
                    user_name: m.user_name,
                })
                .collect(),
            created_by: t.created_by,
            created_at: t.created_at,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TeamReply {
    pub success: bool,
    pub message: String,
    pub team: TeamDto,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TeamListReply {
    pub success: bool,
    pub teams: Vec<TeamDto>,
    pub total: usize,
}
