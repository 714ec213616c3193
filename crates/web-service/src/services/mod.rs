//! 服务层模块
//!
//! 包含业务逻辑的服务层实现。服务只依赖仓库trait和邮件发送器trait，
//! 具体实现在启动时注入。

pub mod application;
pub mod error;
pub mod notifier;
pub mod project;
pub mod subscription;
pub mod team;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use application::{ApplicationDraft, ApplicationService};
pub use error::{ServiceError, ServiceResult};
pub use notifier::Notifier;
pub use project::{NotificationSummary, ProjectDraft, ProjectService, PublishOutcome, TestNotificationOutcome};
pub use subscription::{Snapshot, SubscriptionService, Topic};
pub use team::{TeamDraft, TeamService, DEFAULT_MAX_MEMBERS};
pub use user::UserService;

use database::Repositories;
use mail_service::{NotificationSender, Templates};
use shared_lib::AppConfig;
use std::sync::Arc;

/// 全部业务服务，clone成本很低
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub projects: ProjectService,
    pub applications: ApplicationService,
    pub teams: TeamService,
    pub subscriptions: SubscriptionService,
}

impl Services {
    pub fn new(repositories: &Repositories, sender: Arc<dyn NotificationSender>, config: &AppConfig) -> Self {
        let notifier = Notifier::new(sender, Templates::new(config.server.frontend_url.clone()));

        let users = UserService::new(
            repositories.users.clone(),
            Arc::new(config.auth.clone()),
            notifier.clone(),
        );
        let projects = ProjectService::new(
            repositories.projects.clone(),
            repositories.applications.clone(),
            users.clone(),
            notifier.clone(),
        );
        let applications = ApplicationService::new(
            repositories.applications.clone(),
            repositories.projects.clone(),
            notifier,
        );
        let teams = TeamService::new(repositories.teams.clone());
        let subscriptions = SubscriptionService::new(
            repositories.feed.clone(),
            projects.clone(),
            applications.clone(),
            users.clone(),
            teams.clone(),
        );

        Self {
            users,
            projects,
            applications,
            teams,
            subscriptions,
        }
    }
}
