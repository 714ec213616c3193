//! 内存存储
//!
//! 未配置 `DATABASE_URL` 时使用，也用于测试。所有集合放在同一把
//! [`RwLock`] 里，写操作（包括唯一性检查）在同一次加锁内完成，
//! 行为与 PostgreSQL 实现保持一致。

use crate::change_feed::{ChangeFeed, ChangeKind, Collection};
use crate::models::{
    ApplicationCreate, ApplicationFilter, ApplicationInfo, ProjectCreate, ProjectFilter, ProjectInfo, TeamCreate,
    TeamInfo, UserCreate, UserFilter, UserInfo, UserProfileUpdate,
};
use crate::repositories::new_document_id;
use crate::repositories::traits::{
    ApplicationRepositoryTrait, ProjectRepositoryTrait, TeamRepositoryTrait, UserRepositoryTrait,
};
use crate::{DatabaseError, DatabaseResult};
use chrono::Utc;
use shared_lib::{ApplicationStatus, ProjectStatus, UserStatus};
use tokio::sync::RwLock;

/// 各集合按插入顺序保存，倒序遍历即为按创建时间倒序
#[derive(Debug, Default)]
struct MemoryState {
    projects: Vec<ProjectInfo>,
    applications: Vec<ApplicationInfo>,
    users: Vec<UserInfo>,
    teams: Vec<TeamInfo>,
}

/// 实现全部仓库trait的内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new(feed: ChangeFeed) -> Self {
        Self {
            state: RwLock::default(),
            feed,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

#[async_trait::async_trait]
impl ProjectRepositoryTrait for MemoryStore {
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo> {
        let now = Utc::now();
        let created = ProjectInfo {
            id: new_document_id(),
            title: project.title,
            role: project.role,
            description: project.description,
            timeline: project.timeline,
            deadline_to_apply: project.deadline_to_apply,
            project_details: project.project_details,
            status: project.status,
            status_reason: None,
            created_by: project.created_by,
            created_by_email: project.created_by_email,
            created_at: now,
            updated_at: now,
        };

        self.state.write().await.projects.push(created.clone());
        self.feed.publish(Collection::Projects, &created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn get_project_by_id(&self, id: &str) -> DatabaseResult<Option<ProjectInfo>> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> DatabaseResult<Vec<ProjectInfo>> {
        let state = self.state.read().await;
        Ok(state.projects.iter().rev().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
        reason: Option<String>,
    ) -> DatabaseResult<ProjectInfo> {
        let updated = {
            let mut state = self.state.write().await;
            let project = state
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| DatabaseError::not_found(format!("project {id}")))?;
            project.status = status;
            project.status_reason = reason;
            project.updated_at = Utc::now();
            project.clone()
        };

        self.feed.publish(Collection::Projects, &updated.id, ChangeKind::Updated);
        Ok(updated)
    }
}

#[async_trait::async_trait]
impl ApplicationRepositoryTrait for MemoryStore {
    async fn create_application(&self, application: ApplicationCreate) -> DatabaseResult<ApplicationInfo> {
        let created = {
            let mut state = self.state.write().await;
            let duplicated = state
                .applications
                .iter()
                .any(|a| a.project_id == application.project_id && a.user_id == application.user_id);
            if duplicated {
                return Err(DatabaseError::UniqueViolation("applications_project_user_key".to_string()));
            }

            let now = Utc::now();
            let created = ApplicationInfo {
                id: new_document_id(),
                project_id: application.project_id,
                project_name: application.project_name,
                user_id: application.user_id,
                user_name: application.user_name,
                user_email: application.user_email,
                username: application.username,
                contact: application.contact,
                skills_description: application.skills_description,
                experience: application.experience,
                deadline_days: application.deadline_days,
                status: ApplicationStatus::Pending,
                applied_at: now,
                updated_at: now,
            };
            state.applications.push(created.clone());
            created
        };

        self.feed.publish(Collection::Applications, &created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn find_application_by_id(&self, id: &str) -> DatabaseResult<Option<ApplicationInfo>> {
        let state = self.state.read().await;
        Ok(state.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application_by_project_and_user(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> DatabaseResult<Option<ApplicationInfo>> {
        let state = self.state.read().await;
        Ok(state
            .applications
            .iter()
            .find(|a| a.project_id == project_id && a.user_id == user_id)
            .cloned())
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> DatabaseResult<Vec<ApplicationInfo>> {
        let state = self.state.read().await;
        Ok(state.applications.iter().rev().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn transition_application_status(
        &self,
        id: &str,
        expected: ApplicationStatus,
        target: ApplicationStatus,
    ) -> DatabaseResult<Option<ApplicationInfo>> {
        let updated = {
            let mut state = self.state.write().await;
            match state.applications.iter_mut().find(|a| a.id == id && a.status == expected) {
                Some(application) => {
                    application.status = target;
                    application.updated_at = Utc::now();
                    application.clone()
                }
                None => return Ok(None),
            }
        };

        self.feed.publish(Collection::Applications, &updated.id, ChangeKind::Updated);
        Ok(Some(updated))
    }
}

impl MemoryStore {
    async fn update_user<F>(&self, id: &str, apply: F) -> DatabaseResult<UserInfo>
    where
        F: FnOnce(&mut UserInfo) + Send,
    {
        let updated = {
            let mut state = self.state.write().await;
            let user = state
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| DatabaseError::not_found(format!("user {id}")))?;
            apply(user);
            user.clone()
        };

        self.feed.publish(Collection::Users, &updated.id, ChangeKind::Updated);
        Ok(updated)
    }
}

#[async_trait::async_trait]
impl UserRepositoryTrait for MemoryStore {
    async fn get_user_by_id(&self, id: &str) -> DatabaseResult<Option<UserInfo>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user_if_absent(&self, user: UserCreate) -> DatabaseResult<(UserInfo, bool)> {
        let created = {
            let mut state = self.state.write().await;
            if let Some(existing) = state.users.iter().find(|u| u.id == user.id) {
                return Ok((existing.clone(), false));
            }

            let now = Utc::now();
            let created = UserInfo {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                status: user.status,
                job_title: None,
                experience: None,
                tech_stack: None,
                bio: None,
                created_at: now,
                updated_at: now,
                last_login: Some(now),
            };
            state.users.push(created.clone());
            created
        };

        self.feed.publish(Collection::Users, &created.id, ChangeKind::Created);
        Ok((created, true))
    }

    async fn list_users(&self, filter: UserFilter) -> DatabaseResult<Vec<UserInfo>> {
        let state = self.state.read().await;
        Ok(state.users.iter().rev().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn update_user_status(&self, id: &str, status: UserStatus) -> DatabaseResult<UserInfo> {
        self.update_user(id, |user| {
            user.status = status;
            user.updated_at = Utc::now();
        })
        .await
    }

    async fn update_user_profile(&self, id: &str, update: UserProfileUpdate) -> DatabaseResult<UserInfo> {
        self.update_user(id, |user| {
            if let Some(name) = update.name {
                user.name = name;
            }
            if update.job_title.is_some() {
                user.job_title = update.job_title;
            }
            if update.experience.is_some() {
                user.experience = update.experience;
            }
            if update.tech_stack.is_some() {
                user.tech_stack = update.tech_stack;
            }
            if update.bio.is_some() {
                user.bio = update.bio;
            }
            user.updated_at = Utc::now();
        })
        .await
    }

    async fn touch_last_login(&self, id: &str) -> DatabaseResult<UserInfo> {
        self.update_user(id, |user| user.last_login = Some(Utc::now())).await
    }

    async fn delete_user(&self, id: &str) -> DatabaseResult<UserInfo> {
        let deleted = {
            let mut state = self.state.write().await;
            let index = state
                .users
                .iter()
                .position(|u| u.id == id)
                .ok_or_else(|| DatabaseError::not_found(format!("user {id}")))?;
            state.users.remove(index)
        };

        self.feed.publish(Collection::Users, &deleted.id, ChangeKind::Deleted);
        Ok(deleted)
    }
}

#[async_trait::async_trait]
impl TeamRepositoryTrait for MemoryStore {
    async fn create_team(&self, team: TeamCreate) -> DatabaseResult<TeamInfo> {
        let created = TeamInfo {
            id: new_document_id(),
            team_name: team.team_name,
            members: team.members,
            created_by: team.created_by,
            created_at: Utc::now(),
        };

        self.state.write().await.teams.push(created.clone());
        self.feed.publish(Collection::Teams, &created.id, ChangeKind::Created);
        Ok(created)
    }

    async fn list_teams(&self) -> DatabaseResult<Vec<TeamInfo>> {
        let state = self.state.read().await;
        Ok(state.teams.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_feed::ChangeEvent;
    use assert_matches::assert_matches;
    use shared_lib::UserRole;
    use std::sync::Arc;

    fn project(title: &str, status: ProjectStatus) -> ProjectCreate {
        ProjectCreate {
            title: title.to_string(),
            role: "Backend".to_string(),
            description: "Build the API".to_string(),
            timeline: "4 weeks".to_string(),
            deadline_to_apply: "2025-12-31".to_string(),
            project_details: Some("secret".to_string()),
            status,
            created_by: "admin-1".to_string(),
            created_by_email: "admin@example.com".to_string(),
        }
    }

    fn application(project_id: &str, user_id: &str) -> ApplicationCreate {
        ApplicationCreate {
            project_id: project_id.to_string(),
            project_name: "Demo".to_string(),
            user_id: user_id.to_string(),
            user_name: "Alice".to_string(),
            user_email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            contact: "alice@example.com".to_string(),
            skills_description: "Rust".to_string(),
            experience: "5 years".to_string(),
            deadline_days: 14,
        }
    }

    fn user(id: &str, role: UserRole) -> UserCreate {
        UserCreate {
            id: id.to_string(),
            name: format!("user {id}"),
            email: format!("{id}@example.com"),
            role,
            status: UserStatus::Active,
        }
    }

    #[tokio::test]
    async fn projects_are_listed_newest_first_and_filtered() {
        let store = MemoryStore::default();
        let first = store.create_project(project("first", ProjectStatus::Active)).await.unwrap();
        let second = store.create_project(project("second", ProjectStatus::Pending)).await.unwrap();
        let third = store.create_project(project("third", ProjectStatus::Approved)).await.unwrap();

        let all = store.list_projects(ProjectFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

        let open = store.list_projects(ProjectFilter::open()).await.unwrap();
        let ids: Vec<_> = open.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![third.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn updating_missing_project_is_not_found() {
        let store = MemoryStore::default();
        let err = store
            .update_project_status("missing", ProjectStatus::Cancelled, None)
            .await
            .unwrap_err();
        assert_matches!(err, DatabaseError::NotFound(_));
    }

    #[tokio::test]
    async fn duplicate_application_is_unique_violation() {
        let store = MemoryStore::default();
        store.create_application(application("p1", "u1")).await.unwrap();

        let err = store.create_application(application("p1", "u1")).await.unwrap_err();
        assert_matches!(err, DatabaseError::UniqueViolation(_));

        // 同一用户申请其他项目不受影响
        store.create_application(application("p2", "u1")).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_duplicate_applications_only_create_one() {
        let store = Arc::new(MemoryStore::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_application(application("p1", "u1")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);

        let filter = ApplicationFilter {
            project_id: Some("p1".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list_applications(filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transition_only_applies_from_expected_status() {
        let store = MemoryStore::default();
        let app = store.create_application(application("p1", "u1")).await.unwrap();

        let approved = store
            .transition_application_status(&app.id, ApplicationStatus::Pending, ApplicationStatus::Approved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert!(approved.updated_at >= app.updated_at);

        let second = store
            .transition_application_status(&app.id, ApplicationStatus::Pending, ApplicationStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(second, None);

        let current = store.find_application_by_id(&app.id).await.unwrap().unwrap();
        assert_eq!(current.status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn create_user_if_absent_keeps_existing_record() {
        let store = MemoryStore::default();
        let (created, inserted) = store.create_user_if_absent(user("u1", UserRole::User)).await.unwrap();
        assert!(inserted);
        store.update_user_status("u1", UserStatus::Inactive).await.unwrap();

        let (again, inserted) = store.create_user_if_absent(user("u1", UserRole::Admin)).await.unwrap();
        assert!(!inserted);
        assert_eq!(again.id, created.id);
        assert_eq!(again.role, UserRole::User);
        assert_eq!(again.status, UserStatus::Inactive);
    }

    #[tokio::test]
    async fn profile_update_keeps_unset_fields() {
        let store = MemoryStore::default();
        store.create_user_if_absent(user("u1", UserRole::User)).await.unwrap();
        store
            .update_user_profile(
                "u1",
                UserProfileUpdate {
                    job_title: Some("Engineer".to_string()),
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_user_profile(
                "u1",
                UserProfileUpdate {
                    bio: Some("updated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.job_title.as_deref(), Some("Engineer"));
        assert_eq!(updated.bio.as_deref(), Some("updated"));
        assert_eq!(updated.name, "user u1");
    }

    #[tokio::test]
    async fn delete_user_removes_record() {
        let store = MemoryStore::default();
        store.create_user_if_absent(user("u1", UserRole::User)).await.unwrap();

        let deleted = store.delete_user("u1").await.unwrap();
        assert_eq!(deleted.id, "u1");
        assert_eq!(store.get_user_by_id("u1").await.unwrap(), None);
        assert_matches!(store.delete_user("u1").await, Err(DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn writes_are_published_to_feed() {
        let store = MemoryStore::default();
        let mut rx = store.feed().subscribe();

        let team = store
            .create_team(TeamCreate {
                team_name: "Rustaceans".to_string(),
                members: vec![],
                created_by: "u1".to_string(),
            })
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ChangeEvent {
                collection: Collection::Teams,
                document_id: team.id,
                kind: ChangeKind::Created,
            }
        );
    }

    #[tokio::test]
    async fn failed_transition_publishes_nothing() {
        let store = MemoryStore::default();
        let mut rx = store.feed().subscribe();

        let result = store
            .transition_application_status("missing", ApplicationStatus::Pending, ApplicationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(rx.try_recv().is_err());
    }
}
