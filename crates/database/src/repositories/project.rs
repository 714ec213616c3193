//! 项目仓库
//!
//! 负责项目相关的数据库操作

use crate::change_feed::{ChangeFeed, ChangeKind, Collection};
use crate::models::project::{ProjectCreate, ProjectFilter, ProjectInfo};
use crate::repositories::new_document_id;
use crate::repositories::traits::ProjectRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use shared_lib::ProjectStatus;
use sqlx::PgPool;
use tracing::debug;

const PROJECT_COLUMNS: &str = r#"
    id, title, role, description, timeline, deadline_to_apply, project_details,
    status, status_reason, created_by, created_by_email, created_at, updated_at
"#;

/// 数据库中的原始行，状态以字符串保存
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    role: String,
    description: String,
    timeline: String,
    deadline_to_apply: String,
    project_details: Option<String>,
    status: String,
    status_reason: Option<String>,
    created_by: String,
    created_by_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for ProjectInfo {
    type Error = DatabaseError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(ProjectInfo {
            status: row.status.parse().map_err(DatabaseError::decode)?,
            id: row.id,
            title: row.title,
            role: row.role,
            description: row.description,
            timeline: row.timeline,
            deadline_to_apply: row.deadline_to_apply,
            project_details: row.project_details,
            status_reason: row.status_reason,
            created_by: row.created_by,
            created_by_email: row.created_by_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 项目仓库结构体（PostgreSQL实现）
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
    feed: ChangeFeed,
}

impl ProjectRepository {
    /// 创建新的项目仓库实例
    pub fn new(pool: PgPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo> {
        debug!("📝 创建项目: {:#?}", project);

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (id, title, role, description, timeline, deadline_to_apply,
                                  project_details, status, created_by, created_by_email,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
            RETURNING {PROJECT_COLUMNS};
            "#
        ))
        .bind(new_document_id())
        .bind(&project.title)
        .bind(&project.role)
        .bind(&project.description)
        .bind(&project.timeline)
        .bind(&project.deadline_to_apply)
        .bind(&project.project_details)
        .bind(project.status.as_str())
        .bind(&project.created_by)
        .bind(&project.created_by_email)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_insert)?;

        let project = ProjectInfo::try_from(row)?;
        self.feed.publish(Collection::Projects, &project.id, ChangeKind::Created);

        debug!("✅ 项目创建成功: {}", project.id);
        Ok(project)
    }

    async fn get_project_by_id(&self, id: &str) -> DatabaseResult<Option<ProjectInfo>> {
        debug!("🔍 根据 ID 获取项目: {}", id);

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProjectInfo::try_from).transpose()
    }

    /// 按状态过滤项目
    ///
    /// 状态列表为空时 `cardinality($1) = 0` 成立，返回全部项目。
    async fn list_projects(&self, filter: ProjectFilter) -> DatabaseResult<Vec<ProjectInfo>> {
        debug!("🔍 查询项目列表: {:?}", filter);

        let statuses: Vec<String> = filter.statuses.iter().map(|s| s.as_str().to_string()).collect();
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE (cardinality($1::text[]) = 0 OR status = ANY($1))
            ORDER BY created_at DESC;
            "#
        ))
        .bind(statuses)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProjectInfo::try_from).collect()
    }

    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
        reason: Option<String>,
    ) -> DatabaseResult<ProjectInfo> {
        debug!("🔄 更新项目 {} 状态: {}", id, status);

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET status = $2,
                status_reason = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS};
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;

        let project = ProjectInfo::try_from(row)?;
        self.feed.publish(Collection::Projects, &project.id, ChangeKind::Updated);
        Ok(project)
    }
}
