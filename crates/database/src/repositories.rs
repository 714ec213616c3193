//! 数据库仓库模块
//!
//! 这里定义数据库操作的Repository层，每个集合一个PostgreSQL实现，
//! 另外有一个实现全部trait的内存存储。

pub mod application;
pub mod memory;
pub mod project;
pub mod team;
pub mod traits;
pub mod user;

// 重新导出具体的类型
pub use application::ApplicationRepository;
pub use memory::MemoryStore;
pub use project::ProjectRepository;
pub use team::TeamRepository;
pub use traits::{ApplicationRepositoryTrait, ProjectRepositoryTrait, TeamRepositoryTrait, UserRepositoryTrait};
pub use user::UserRepository;

/// 生成文档ID（32位十六进制字符串）
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
