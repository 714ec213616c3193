//! 数据库模型模块
//!
//! 这里定义与数据库表对应的结构体和相关操作

pub mod application;
pub mod project;
pub mod team;
pub mod user;

// 重新导出具体的模型
pub use application::{ApplicationCreate, ApplicationFilter, ApplicationInfo};
pub use project::{ProjectCreate, ProjectFilter, ProjectInfo};
pub use team::{TeamCreate, TeamInfo, TeamMember};
pub use user::{UserCreate, UserFilter, UserInfo, UserProfileUpdate};
