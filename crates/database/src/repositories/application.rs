//! 申请仓库
//!
//! 负责申请相关的数据库操作。重复申请由表上的
//! `applications_project_user_key` 唯一约束保证。

use crate::change_feed::{ChangeFeed, ChangeKind, Collection};
use crate::models::application::{ApplicationCreate, ApplicationFilter, ApplicationInfo};
use crate::repositories::new_document_id;
use crate::repositories::traits::ApplicationRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use shared_lib::ApplicationStatus;
use sqlx::PgPool;
use tracing::debug;

const APPLICATION_COLUMNS: &str = r#"
    id, project_id, project_name, user_id, user_name, user_email, username, contact,
    skills_description, experience, deadline_days, status, applied_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    project_id: String,
    project_name: String,
    user_id: String,
    user_name: String,
    user_email: String,
    username: String,
    contact: String,
    skills_description: String,
    experience: String,
    deadline_days: i32,
    status: String,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for ApplicationInfo {
    type Error = DatabaseError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(ApplicationInfo {
            status: row.status.parse().map_err(DatabaseError::decode)?,
            id: row.id,
            project_id: row.project_id,
            project_name: row.project_name,
            user_id: row.user_id,
            user_name: row.user_name,
            user_email: row.user_email,
            username: row.username,
            contact: row.contact,
            skills_description: row.skills_description,
            experience: row.experience,
            deadline_days: row.deadline_days,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}

/// 申请仓库结构体（PostgreSQL实现）
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
    feed: ChangeFeed,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }
}

#[async_trait::async_trait]
impl ApplicationRepositoryTrait for ApplicationRepository {
    async fn create_application(&self, application: ApplicationCreate) -> DatabaseResult<ApplicationInfo> {
        debug!(
            "📝 创建申请 - 项目: {}, 用户: {}",
            application.project_id, application.user_id
        );

        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (id, project_id, project_name, user_id, user_name, user_email,
                                      username, contact, skills_description, experience,
                                      deadline_days, status, applied_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending', now(), now())
            RETURNING {APPLICATION_COLUMNS};
            "#
        ))
        .bind(new_document_id())
        .bind(&application.project_id)
        .bind(&application.project_name)
        .bind(&application.user_id)
        .bind(&application.user_name)
        .bind(&application.user_email)
        .bind(&application.username)
        .bind(&application.contact)
        .bind(&application.skills_description)
        .bind(&application.experience)
        .bind(application.deadline_days)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_insert)?;

        let application = ApplicationInfo::try_from(row)?;
        self.feed.publish(Collection::Applications, &application.id, ChangeKind::Created);

        debug!("✅ 申请创建成功: {}", application.id);
        Ok(application)
    }

    async fn find_application_by_id(&self, id: &str) -> DatabaseResult<Option<ApplicationInfo>> {
        debug!("🔍 根据 ID 获取申请: {}", id);

        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationInfo::try_from).transpose()
    }

    async fn find_application_by_project_and_user(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> DatabaseResult<Option<ApplicationInfo>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE project_id = $1 AND user_id = $2 LIMIT 1"
        ))
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationInfo::try_from).transpose()
    }

    /// 按条件查询申请
    ///
    /// 使用 `$n IS NULL OR column = $n` 处理可选条件，避免拼接SQL。
    async fn list_applications(&self, filter: ApplicationFilter) -> DatabaseResult<Vec<ApplicationInfo>> {
        debug!("🔍 查询申请列表: {:?}", filter);

        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM applications
            WHERE ($1::text IS NULL OR project_id = $1)
              AND ($2::text IS NULL OR user_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY applied_at DESC;
            "#
        ))
        .bind(filter.project_id)
        .bind(filter.user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ApplicationInfo::try_from).collect()
    }

    async fn transition_application_status(
        &self,
        id: &str,
        expected: ApplicationStatus,
        target: ApplicationStatus,
    ) -> DatabaseResult<Option<ApplicationInfo>> {
        debug!("🔄 更新申请 {} 状态: {} -> {}", id, expected, target);

        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE applications
            SET status = $3,
                updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING {APPLICATION_COLUMNS};
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(target.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let application = row.map(ApplicationInfo::try_from).transpose()?;
        if let Some(application) = &application {
            self.feed.publish(Collection::Applications, &application.id, ChangeKind::Updated);
        }
        Ok(application)
    }
}
