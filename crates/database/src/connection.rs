use crate::{DatabaseError, DatabaseResult};
use shared_lib::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// 数据库连接池
pub type DatabasePool = Pool<Postgres>;

/// 创建数据库连接池并执行迁移（一站式函数）
///
/// 调用方需要保证 `config.database_url` 已设置，否则返回连接错误。
pub async fn initialize_database(config: &AppConfig) -> DatabaseResult<DatabasePool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| DatabaseError::connection("未配置 DATABASE_URL"))?;

    // pool内部是Arc，clone后可以安全跨线程使用
    let pool = PgPoolOptions::new()
        .min_connections(2)
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        // 空闲1小时释放
        .idle_timeout(Duration::from_secs(3600))
        .max_lifetime(Duration::from_secs(3600 * 6))
        .test_before_acquire(true)
        .connect(database_url)
        .await
        .map_err(|e| DatabaseError::connection(format!("连接PostgreSQL数据库失败: {e}")))?;

    info!("🗄️ 数据库连接池创建成功 (max_connections={})", config.db_max_connections);

    info!("🔄 开始执行数据库迁移...");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::migration(format!("数据库迁移失败: {e}")))?;

    info!("✅ 数据库迁移完成");

    Ok(pool)
}
