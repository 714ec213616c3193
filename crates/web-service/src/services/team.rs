//! 团队服务

use crate::services::error::{ServiceError, ServiceResult};
use database::{TeamCreate, TeamInfo, TeamMember, TeamRepositoryTrait, UserInfo};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// 团队人数上限的默认值
pub const DEFAULT_MAX_MEMBERS: usize = 5;

/// 管理员提交的团队信息
#[derive(Debug, Clone)]
pub struct TeamDraft {
    pub team_name: String,
    pub members: Vec<TeamMember>,
    /// 人数上限，未指定时使用 [`DEFAULT_MAX_MEMBERS`]
    pub max_members: Option<usize>,
}

#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepositoryTrait>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepositoryTrait>) -> Self {
        Self { teams }
    }

    /// 创建团队
    ///
    /// 名称不能为空，成员数量在 1 到人数上限之间，并且不能重复。
    /// 这些规则只在创建时检查。
    pub async fn create(&self, admin: &UserInfo, draft: TeamDraft) -> ServiceResult<TeamInfo> {
        let team_name = draft.team_name.trim().to_string();
        if team_name.is_empty() {
            return Err(ServiceError::InvalidArgument("Team name is required".to_string()));
        }

        let max_members = draft.max_members.unwrap_or(DEFAULT_MAX_MEMBERS);
        if draft.members.is_empty() {
            return Err(ServiceError::InvalidArgument("Select at least one member".to_string()));
        }
        if draft.members.len() > max_members {
            return Err(ServiceError::InvalidArgument(format!(
                "A team can have at most {max_members} members"
            )));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = draft.members.iter().find(|m| !seen.insert(m.user_id.clone())) {
            return Err(ServiceError::InvalidArgument(format!(
                "Member {} is selected more than once",
                duplicate.user_id
            )));
        }

        let team = self
            .teams
            .create_team(TeamCreate {
                team_name,
                members: draft.members,
                created_by: admin.id.clone(),
            })
            .await?;

        info!("👥 团队已创建: {} ({} 名成员)", team.team_name, team.members.len());
        Ok(team)
    }

    pub async fn list(&self) -> ServiceResult<Vec<TeamInfo>> {
        Ok(self.teams.list_teams().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;
    use assert_matches::assert_matches;

    fn member(id: &str) -> TeamMember {
        TeamMember {
            user_id: id.to_string(),
            user_name: format!("User {id}"),
        }
    }

    fn draft(name: &str, members: &[&str], max_members: Option<usize>) -> TeamDraft {
        TeamDraft {
            team_name: name.to_string(),
            members: members.iter().map(|id| member(id)).collect(),
            max_members,
        }
    }

    #[tokio::test]
    async fn create_team_persists_members_in_order() {
        let fixture = Fixture::new();
        let admin = fixture.admin().await;

        let team = fixture
            .services
            .teams
            .create(&admin, draft("  Rustaceans ", &["u1", "u2"], None))
            .await
            .unwrap();
        assert_eq!(team.team_name, "Rustaceans");
        assert_eq!(team.members, vec![member("u1"), member("u2")]);
        assert_eq!(team.created_by, admin.id);

        let teams = fixture.services.teams.list().await.unwrap();
        assert_eq!(teams, vec![team]);
    }

    #[tokio::test]
    async fn create_team_validates_draft() {
        let fixture = Fixture::new();
        let admin = fixture.admin().await;
        let teams = &fixture.services.teams;

        assert_matches!(
            teams.create(&admin, draft("   ", &["u1"], None)).await,
            Err(ServiceError::InvalidArgument(msg)) if msg == "Team name is required"
        );
        assert_matches!(
            teams.create(&admin, draft("Empty", &[], None)).await,
            Err(ServiceError::InvalidArgument(msg)) if msg == "Select at least one member"
        );
        assert_matches!(
            teams.create(&admin, draft("Big", &["u1", "u2", "u3", "u4", "u5", "u6"], None)).await,
            Err(ServiceError::InvalidArgument(_))
        );
        assert_matches!(
            teams.create(&admin, draft("Pair", &["u1", "u2", "u3"], Some(2))).await,
            Err(ServiceError::InvalidArgument(_))
        );
        assert_matches!(
            teams.create(&admin, draft("Twice", &["u1", "u1"], None)).await,
            Err(ServiceError::InvalidArgument(msg)) if msg.contains("u1")
        );

        assert!(teams.list().await.unwrap().is_empty());
    }
}
