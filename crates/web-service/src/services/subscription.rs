//! 数据订阅
//!
//! 订阅建立时立即推送一次完整快照，之后每当相关集合发生变更就重新查询并推送。
//! 接收方落后（`Lagged`）时直接重新查询。调用方丢弃stream即取消订阅。

use crate::services::application::ApplicationService;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::project::ProjectService;
use crate::services::team::TeamService;
use crate::services::user::UserService;
use database::{ApplicationInfo, ChangeFeed, Collection, ProjectInfo, TeamInfo, UserInfo};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::debug;

/// 可订阅的数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// 当前用户可见的项目
    Projects,
    /// 全部申请，可按项目过滤（管理员）
    Applications { project_id: Option<String> },
    /// 当前用户自己的申请
    MyApplications,
    /// 普通用户列表（管理员）
    Users,
    /// 团队列表（管理员）
    Teams,
}

impl Topic {
    pub fn parse(collection: &str, project_id: Option<String>) -> ServiceResult<Self> {
        match collection {
            "projects" => Ok(Topic::Projects),
            "applications" => Ok(Topic::Applications {
                project_id: project_id.filter(|id| !id.trim().is_empty()),
            }),
            "my-applications" => Ok(Topic::MyApplications),
            "users" => Ok(Topic::Users),
            "teams" => Ok(Topic::Teams),
            other => Err(ServiceError::InvalidArgument(format!(
                "Unknown collection: {other}. Must be projects, applications, my-applications, users, or teams"
            ))),
        }
    }

    pub fn admin_only(&self) -> bool {
        matches!(self, Topic::Applications { .. } | Topic::Users | Topic::Teams)
    }

    /// 哪些集合的变更会影响该订阅
    ///
    /// 项目详情是否可见取决于申请状态，所以项目订阅也关注申请变更。
    fn watches(&self, collection: Collection) -> bool {
        match self {
            Topic::Projects => matches!(collection, Collection::Projects | Collection::Applications),
            Topic::Applications { .. } | Topic::MyApplications => collection == Collection::Applications,
            Topic::Users => collection == Collection::Users,
            Topic::Teams => collection == Collection::Teams,
        }
    }
}

/// 一次完整的查询结果
#[derive(Debug, Clone)]
pub enum Snapshot {
    Projects(Vec<ProjectInfo>),
    Applications(Vec<ApplicationInfo>),
    Users(Vec<UserInfo>),
    Teams(Vec<TeamInfo>),
}

#[derive(Clone)]
pub struct SubscriptionService {
    feed: ChangeFeed,
    projects: ProjectService,
    applications: ApplicationService,
    users: UserService,
    teams: TeamService,
}

struct SubscriptionState {
    service: SubscriptionService,
    viewer: UserInfo,
    topic: Topic,
    rx: Receiver<database::ChangeEvent>,
    initial: bool,
}

impl SubscriptionService {
    pub fn new(
        feed: ChangeFeed,
        projects: ProjectService,
        applications: ApplicationService,
        users: UserService,
        teams: TeamService,
    ) -> Self {
        Self {
            feed,
            projects,
            applications,
            users,
            teams,
        }
    }

    /// 建立订阅
    ///
    /// 先注册变更接收端再查询首个快照，保证两者之间的变更不会丢失。
    pub fn subscribe(
        &self,
        viewer: UserInfo,
        topic: Topic,
    ) -> ServiceResult<impl Stream<Item = ServiceResult<Snapshot>> + Send + 'static> {
        if topic.admin_only() && !viewer.is_admin() {
            return Err(ServiceError::Forbidden("Admin access required".to_string()));
        }

        debug!("📡 用户 {} 订阅 {:?}", viewer.id, topic);

        let state = SubscriptionState {
            service: self.clone(),
            viewer,
            topic,
            rx: self.feed.subscribe(),
            initial: true,
        };

        Ok(stream::unfold(state, |mut state| async move {
            if !state.initial {
                loop {
                    match state.rx.recv().await {
                        Ok(event) if state.topic.watches(event.collection) => break,
                        Ok(_) => continue,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("📡 订阅落后 {} 条变更，重新查询", skipped);
                            break;
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }

            state.initial = false;
            let snapshot = state.service.snapshot(&state.viewer, &state.topic).await;
            Some((snapshot, state))
        }))
    }

    async fn snapshot(&self, viewer: &UserInfo, topic: &Topic) -> ServiceResult<Snapshot> {
        Ok(match topic {
            Topic::Projects => Snapshot::Projects(self.projects.list_visible(viewer).await?),
            Topic::Applications { project_id } => {
                Snapshot::Applications(self.applications.list(project_id.clone()).await?)
            }
            Topic::MyApplications => Snapshot::Applications(self.applications.list_mine(&viewer.id).await?),
            Topic::Users => Snapshot::Users(self.users.list_users().await?),
            Topic::Teams => Snapshot::Teams(self.teams.list().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;
    use crate::services::{ApplicationDraft, ProjectDraft};
    use assert_matches::assert_matches;
    use futures::StreamExt;
    use std::time::Duration;

    fn project(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            role: "Backend Developer".to_string(),
            description: "Build a high performance gateway".to_string(),
            timeline: "3 months".to_string(),
            deadline_to_apply: "2025-12-31".to_string(),
            project_details: None,
        }
    }

    async fn next<S: Stream<Item = ServiceResult<Snapshot>> + Unpin>(stream: &mut S) -> Snapshot {
        tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("snapshot in time")
            .expect("stream open")
            .expect("snapshot ok")
    }

    #[test]
    fn parse_topics() {
        assert_eq!(Topic::parse("projects", None).unwrap(), Topic::Projects);
        assert_eq!(
            Topic::parse("applications", Some(" ".to_string())).unwrap(),
            Topic::Applications { project_id: None }
        );
        assert_eq!(Topic::parse("my-applications", None).unwrap(), Topic::MyApplications);
        assert_matches!(Topic::parse("analytics", None), Err(ServiceError::InvalidArgument(_)));
        assert!(Topic::Users.admin_only());
        assert!(!Topic::MyApplications.admin_only());
    }

    #[tokio::test]
    async fn admin_topics_require_admin() {
        let fixture = Fixture::new();
        let alice = fixture.user("alice").await;

        let result = fixture.services.subscriptions.subscribe(alice, Topic::Users).map(|_| ());
        assert_matches!(result, Err(ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn projects_stream_emits_snapshot_after_each_change() {
        let fixture = Fixture::new();
        let admin = fixture.admin().await;
        let alice = fixture.user("alice").await;
        fixture.services.projects.publish(&admin, project("First")).await.unwrap();

        let stream = fixture.services.subscriptions.subscribe(alice, Topic::Projects).unwrap();
        let mut stream = Box::pin(stream);

        assert_matches!(next(&mut stream).await, Snapshot::Projects(p) if p.len() == 1);

        fixture.services.projects.publish(&admin, project("Second")).await.unwrap();
        assert_matches!(
            next(&mut stream).await,
            Snapshot::Projects(p) if p.len() == 2 && p[0].title == "Second"
        );
    }

    #[tokio::test]
    async fn my_applications_stream_follows_decisions() {
        let fixture = Fixture::new();
        let admin = fixture.admin().await;
        let alice = fixture.user("alice").await;
        let published = fixture.services.projects.publish(&admin, project("Gateway")).await.unwrap();

        let stream = fixture
            .services
            .subscriptions
            .subscribe(alice.clone(), Topic::MyApplications)
            .unwrap();
        let mut stream = Box::pin(stream);
        assert_matches!(next(&mut stream).await, Snapshot::Applications(a) if a.is_empty());

        let application = fixture
            .services
            .applications
            .submit(
                &alice,
                ApplicationDraft {
                    project_id: published.project.id,
                    username: "alice".to_string(),
                    contact: "alice@example.com".to_string(),
                    skills_description: "Rust, PostgreSQL and distributed systems".to_string(),
                    experience: "5 years".to_string(),
                    deadline_days: 10,
                },
            )
            .await
            .unwrap();
        assert_matches!(next(&mut stream).await, Snapshot::Applications(a) if a.len() == 1);

        fixture
            .services
            .applications
            .transition(&application.id, shared_lib::ApplicationStatus::Approved)
            .await
            .unwrap();
        assert_matches!(
            next(&mut stream).await,
            Snapshot::Applications(a) if a[0].status == shared_lib::ApplicationStatus::Approved
        );
    }
}
