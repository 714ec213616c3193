//! 用户仓库
//!
//! 负责用户相关的数据库操作

use crate::change_feed::{ChangeFeed, ChangeKind, Collection};
use crate::models::user::{UserCreate, UserFilter, UserInfo, UserProfileUpdate};
use crate::repositories::traits::UserRepositoryTrait;
use crate::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use shared_lib::UserStatus;
use sqlx::PgPool;
use tracing::debug;

const USER_COLUMNS: &str = r#"
    id, name, email, role, status, job_title, experience, tech_stack, bio,
    created_at, updated_at, last_login
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    status: String,
    job_title: Option<String>,
    experience: Option<String>,
    tech_stack: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for UserInfo {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserInfo {
            role: row.role.parse().map_err(DatabaseError::decode)?,
            status: row.status.parse().map_err(DatabaseError::decode)?,
            id: row.id,
            name: row.name,
            email: row.email,
            job_title: row.job_title,
            experience: row.experience,
            tech_stack: row.tech_stack,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        })
    }
}

/// 用户仓库结构体（PostgreSQL实现）
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    feed: ChangeFeed,
}

impl UserRepository {
    pub fn new(pool: PgPool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    async fn fetch_updated(&self, id: &str, row: Option<UserRow>) -> DatabaseResult<UserInfo> {
        let user = row
            .map(UserInfo::try_from)
            .transpose()?
            .ok_or_else(|| DatabaseError::not_found(format!("user {id}")))?;
        self.feed.publish(Collection::Users, &user.id, ChangeKind::Updated);
        Ok(user)
    }
}

#[async_trait::async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_user_by_id(&self, id: &str) -> DatabaseResult<Option<UserInfo>> {
        debug!("🔍 根据 ID 获取用户: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 LIMIT 1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserInfo::try_from).transpose()
    }

    /// 首次登录创建用户
    ///
    /// `ON CONFLICT DO NOTHING` 之后没有返回行，说明用户已经存在，再查一次即可。
    async fn create_user_if_absent(&self, user: UserCreate) -> DatabaseResult<(UserInfo, bool)> {
        let inserted = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, role, status, created_at, updated_at, last_login)
            VALUES ($1, $2, $3, $4, $5, now(), now(), now())
            ON CONFLICT (id) DO NOTHING
            RETURNING {USER_COLUMNS};
            "#
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => {
                let created = UserInfo::try_from(row)?;
                debug!("✅ 新用户创建成功: {} ({})", created.id, created.role);
                self.feed.publish(Collection::Users, &created.id, ChangeKind::Created);
                Ok((created, true))
            }
            // 并发插入时另一个请求已经创建了记录
            None => self
                .get_user_by_id(&user.id)
                .await?
                .map(|existing| (existing, false))
                .ok_or_else(|| DatabaseError::not_found(format!("user {}", user.id))),
        }
    }

    async fn list_users(&self, filter: UserFilter) -> DatabaseResult<Vec<UserInfo>> {
        debug!("🔍 查询用户列表: {:?}", filter);

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC;
            "#
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserInfo::try_from).collect()
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> DatabaseResult<UserInfo> {
        debug!("🔄 更新用户 {} 状态: {}", id, status);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET status = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.fetch_updated(id, row).await
    }

    /// 更新个人资料
    ///
    /// 使用`coalesce`保证传入`None`的字段保持原值
    async fn update_user_profile(&self, id: &str, update: UserProfileUpdate) -> DatabaseResult<UserInfo> {
        debug!("🔄 更新用户 {} 资料: {:?}", id, update);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = coalesce($2, name),
                job_title = coalesce($3, job_title),
                experience = coalesce($4, experience),
                tech_stack = coalesce($5, tech_stack),
                bio = coalesce($6, bio),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS};
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.job_title)
        .bind(update.experience)
        .bind(update.tech_stack)
        .bind(update.bio)
        .fetch_optional(&self.pool)
        .await?;

        self.fetch_updated(id, row).await
    }

    async fn touch_last_login(&self, id: &str) -> DatabaseResult<UserInfo> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET last_login = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.fetch_updated(id, row).await
    }

    async fn delete_user(&self, id: &str) -> DatabaseResult<UserInfo> {
        debug!("🗑️ 删除用户: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let user = row
            .map(UserInfo::try_from)
            .transpose()?
            .ok_or_else(|| DatabaseError::not_found(format!("user {id}")))?;
        self.feed.publish(Collection::Users, &user.id, ChangeKind::Deleted);
        Ok(user)
    }
}
