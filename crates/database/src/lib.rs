//! 数据库操作模块
//!
//! 这个模块提供了数据库连接、迁移、仓库实现以及写操作的变更通知

pub mod change_feed;
pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

use std::sync::Arc;

pub use change_feed::{ChangeEvent, ChangeFeed, ChangeKind, Collection};
pub use connection::{initialize_database, DatabasePool};
pub use error::DatabaseError;
pub use models::{
    ApplicationCreate, ApplicationFilter, ApplicationInfo, ProjectCreate, ProjectFilter, ProjectInfo, TeamCreate,
    TeamInfo, TeamMember, UserCreate, UserFilter, UserInfo, UserProfileUpdate,
};
pub use repositories::{
    ApplicationRepository, ApplicationRepositoryTrait, MemoryStore, ProjectRepository, ProjectRepositoryTrait,
    TeamRepository, TeamRepositoryTrait, UserRepository, UserRepositoryTrait,
};

/// 数据库操作结果类型
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// 存储类型，用于健康检查展示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// 全部仓库的集合
///
/// 所有仓库共享同一个 [`ChangeFeed`]，服务层通过它订阅数据变更。
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ProjectRepositoryTrait>,
    pub applications: Arc<dyn ApplicationRepositoryTrait>,
    pub users: Arc<dyn UserRepositoryTrait>,
    pub teams: Arc<dyn TeamRepositoryTrait>,
    pub feed: ChangeFeed,
    pub kind: StoreKind,
}

impl Repositories {
    /// 基于PostgreSQL连接池创建仓库
    pub fn postgres(pool: DatabasePool, feed: ChangeFeed) -> Self {
        Self {
            projects: Arc::new(ProjectRepository::new(pool.clone(), feed.clone())),
            applications: Arc::new(ApplicationRepository::new(pool.clone(), feed.clone())),
            users: Arc::new(UserRepository::new(pool.clone(), feed.clone())),
            teams: Arc::new(TeamRepository::new(pool, feed.clone())),
            feed,
            kind: StoreKind::Postgres,
        }
    }

    /// 创建内存仓库，进程退出后数据丢失
    pub fn in_memory() -> Self {
        let feed = ChangeFeed::default();
        let store = Arc::new(MemoryStore::new(feed.clone()));
        Self {
            projects: store.clone(),
            applications: store.clone(),
            users: store.clone(),
            teams: store,
            feed,
            kind: StoreKind::Memory,
        }
    }
}
