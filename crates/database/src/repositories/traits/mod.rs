//! 数据库仓库 trait 定义
//!
//! 这里定义了各种数据库仓库的抽象接口
//!
//! ## Repository Trait 设计模式 🎯
//!
//! 所有 Repository trait 都遵循统一的约束：
//!
//! ```rust,ignore
//! #[async_trait::async_trait]
//! pub trait XxxRepositoryTrait: Send + Sync + 'static {
//!     // 异步方法定义...
//! }
//! ```
//!
//! - `Send + Sync`：仓库实例会放在 `Arc<dyn XxxRepositoryTrait>` 里被多个请求并发使用
//! - `'static`：仓库作为应用服务长期存活，不依赖短期引用
//!
//! 服务层只依赖这些 trait，启动时根据配置注入 PostgreSQL 实现或内存实现 [`crate::MemoryStore`]：
//!
//! ```rust,ignore
//! let repositories = match &config.database_url {
//!     Some(_) => Repositories::postgres(pool, ChangeFeed::default()),
//!     None => Repositories::in_memory(),
//! };
//!
//! let application = repositories.applications.find_application_by_id("app-1").await?;
//! ```
//!
//! ### 约定 ✅
//!
//! 1. 所有写操作在提交后向 [`crate::ChangeFeed`] 发布变更
//! 2. 查询不到单条记录时返回 `Ok(None)`，更新/删除不存在的记录返回 [`crate::DatabaseError::NotFound`]
//! 3. 唯一约束冲突统一返回 [`crate::DatabaseError::UniqueViolation`]

pub mod application;
pub mod project;
pub mod team;
pub mod user;

// 重新导出
pub use application::ApplicationRepositoryTrait;
pub use project::ProjectRepositoryTrait;
pub use team::TeamRepositoryTrait;
pub use user::UserRepositoryTrait;
