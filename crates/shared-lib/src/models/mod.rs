pub mod config;
pub mod status;

// 重新导出具体的类型
pub use config::{AppConfig, AuthConfig, MailConfig, ServerConfig};
pub use status::{ApplicationStatus, ParseStatusError, ProjectStatus, UserRole, UserStatus};
