//! 团队仓库
//!
//! 成员列表存放在 `members` JSONB 列中，团队和成员一次写入

use crate::change_feed::{ChangeFeed, ChangeKind, Collection};
use crate::models::team::{TeamCreate, TeamInfo, TeamMember};
use crate::repositories::new_document_id;
use crate::repositories::traits::TeamRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: String,
    team_name: String,
    members: Json<Vec<TeamMember>>,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl From<TeamRow> for TeamInfo {
    fn from(row: TeamRow) -> Self {
        TeamInfo {
            id: row.id,
            team_name: row.team_name,
            members: row.members.0,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// 团队仓库结构体（PostgreSQL实现）
#[derive(Debug, Clone)]
pub struct TeamRepository {
    pool: PgPool,
    feed: ChangeFeed,
}

impl TeamRepository {
    pub fn new(pool: PgPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }
}

#[async_trait::async_trait]
impl TeamRepositoryTrait for TeamRepository {
    async fn create_team(&self, team: TeamCreate) -> DatabaseResult<TeamInfo> {
        debug!("📝 创建团队: {} ({} 名成员)", team.team_name, team.members.len());

        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (id, team_name, members, created_by, created_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING id, team_name, members, created_by, created_at;
            "#,
        )
        .bind(new_document_id())
        .bind(&team.team_name)
        .bind(Json(&team.members))
        .bind(&team.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_insert)?;

        let team = TeamInfo::from(row);
        self.feed.publish(Collection::Teams, &team.id, ChangeKind::Created);
        Ok(team)
    }

    async fn list_teams(&self) -> DatabaseResult<Vec<TeamInfo>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "SELECT id, team_name, members, created_by, created_at FROM teams ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TeamInfo::from).collect())
    }
}
