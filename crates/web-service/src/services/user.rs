//! 用户服务
//!
//! 负责首次登录时的用户创建，以及管理员对用户的管理操作

use crate::auth::Identity;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::notifier::Notifier;
use database::{UserCreate, UserFilter, UserInfo, UserProfileUpdate, UserRepositoryTrait};
use mail_service::Recipient;
use shared_lib::{AuthConfig, UserRole, UserStatus};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepositoryTrait>,
    auth: Arc<AuthConfig>,
    notifier: Notifier,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepositoryTrait>, auth: Arc<AuthConfig>, notifier: Notifier) -> Self {
        Self { users, auth, notifier }
    }

    /// 根据身份信息查找用户，不存在时创建
    ///
    /// 角色只在创建时根据 `ADMIN_EMAILS` 决定，之后不会随配置变化。
    pub async fn resolve_identity(&self, identity: &Identity) -> ServiceResult<UserInfo> {
        if let Some(user) = self.users.get_user_by_id(&identity.uid).await? {
            return Ok(user);
        }

        let role = if self.auth.is_admin_email(&identity.email) {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let (user, created) = self
            .users
            .create_user_if_absent(UserCreate {
                id: identity.uid.clone(),
                name: identity.display_name(),
                email: identity.email.clone(),
                role,
                status: UserStatus::Active,
            })
            .await?;

        // 并发的首次请求只有插入成功的一方发送欢迎邮件
        if !created {
            return Ok(user);
        }

        info!("👤 首次登录，创建用户 {} ({})", user.id, user.role);
        if !user.email.is_empty() {
            let welcome = self.notifier.templates().welcome(&user.email, &user.name);
            self.notifier.dispatch(welcome);
        }

        Ok(user)
    }

    /// 当前登录用户，同时记录登录时间
    pub async fn current_user(&self, user: &UserInfo) -> ServiceResult<UserInfo> {
        Ok(self.users.touch_last_login(&user.id).await?)
    }

    pub async fn update_profile(&self, user_id: &str, update: UserProfileUpdate) -> ServiceResult<UserInfo> {
        debug!("🔄 用户 {} 更新资料", user_id);
        Ok(self.users.update_user_profile(user_id, update).await?)
    }

    /// 全部普通用户，按创建时间倒序
    pub async fn list_users(&self) -> ServiceResult<Vec<UserInfo>> {
        let filter = UserFilter {
            role: Some(UserRole::User),
            status: None,
        };
        Ok(self.users.list_users(filter).await?)
    }

    pub async fn get_user(&self, id: &str) -> ServiceResult<UserInfo> {
        self.users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// 更新用户状态
    ///
    /// # 参数
    /// - `status`: 字符串形式的状态，只接受 `active` / `inactive` / `pending`
    pub async fn update_status(&self, id: &str, status: &str) -> ServiceResult<UserInfo> {
        let status: UserStatus = status
            .parse()
            .map_err(|_| ServiceError::InvalidArgument("Invalid status. Must be active, inactive, or pending".to_string()))?;

        self.users.update_user_status(id, status).await.map_err(not_found_as("User not found"))
    }

    pub async fn delete_user(&self, id: &str) -> ServiceResult<UserInfo> {
        let user = self.users.delete_user(id).await.map_err(not_found_as("User not found"))?;
        info!("🗑️ 用户已删除: {} ({})", user.id, user.email);
        Ok(user)
    }

    /// 可接收岗位通知的用户：普通用户、状态为`active`、邮箱非空
    pub async fn notification_recipients(&self) -> ServiceResult<Vec<UserInfo>> {
        let filter = UserFilter {
            role: Some(UserRole::User),
            status: Some(UserStatus::Active),
        };
        let users = self.users.list_users(filter).await?;
        Ok(users.into_iter().filter(|u| !u.email.trim().is_empty()).collect())
    }

    /// 新项目群发的收件人：所有邮箱非空的普通用户，不区分状态
    pub async fn publication_recipients(&self) -> ServiceResult<Vec<Recipient>> {
        let users = self.list_users().await?;
        Ok(users
            .into_iter()
            .filter(|u| !u.email.trim().is_empty())
            .map(|u| Recipient {
                name: u.name,
                email: u.email,
            })
            .collect())
    }
}

/// 把存储层的NotFound替换为统一的提示信息
pub(crate) fn not_found_as(message: &'static str) -> impl Fn(database::DatabaseError) -> ServiceError {
    move |err| match err {
        database::DatabaseError::NotFound(_) => ServiceError::NotFound(message.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn first_login_provisions_user_and_sends_welcome() {
        let fixture = Fixture::new();

        let alice = fixture.user_with("alice", "alice@example.com", "Alice").await;
        assert_eq!(alice.role, UserRole::User);
        assert_eq!(alice.status, UserStatus::Active);

        let admin = fixture.admin().await;
        assert_eq!(admin.role, UserRole::Admin);

        let welcome = fixture.sender.wait_for_subject("Welcome to Projectify").await.expect("welcome mail");
        assert!(welcome.to == "alice@example.com" || welcome.to == "admin@example.com");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_logins_send_one_welcome() {
        let fixture = Fixture::new();

        let logins = (0..8).map(|_| fixture.user_with("bob", "bob@example.com", "Bob"));
        let users = futures::future::join_all(logins).await;
        assert!(users.iter().all(|u| u.id == "bob"));

        fixture.sender.wait_for_subject("Welcome to Projectify").await.expect("welcome mail");
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let welcomes = fixture
            .sender
            .sent()
            .into_iter()
            .filter(|m| m.subject.contains("Welcome to Projectify"))
            .count();
        assert_eq!(welcomes, 1);
    }

    #[tokio::test]
    async fn role_is_fixed_after_provisioning() {
        let fixture = Fixture::new();
        let first = fixture.user_with("u1", "someone@example.com", "Someone").await;

        // 同一uid换成管理员邮箱，角色保持不变
        let again = fixture.user_with("u1", "admin@example.com", "Someone").await;
        assert_eq!(again.id, first.id);
        assert_eq!(again.role, UserRole::User);
    }

    #[tokio::test]
    async fn list_users_excludes_admins() {
        let fixture = Fixture::new();
        fixture.admin().await;
        fixture.user("u1").await;
        fixture.user("u2").await;

        let users = fixture.services.users.list_users().await.unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u2", "u1"]);
    }

    #[tokio::test]
    async fn update_status_validates_value() {
        let fixture = Fixture::new();
        let user = fixture.user("u1").await;

        let err = fixture.services.users.update_status(&user.id, "banned").await.unwrap_err();
        assert_matches!(err, ServiceError::InvalidArgument(msg) if msg == "Invalid status. Must be active, inactive, or pending");

        let updated = fixture.services.users.update_status(&user.id, "inactive").await.unwrap();
        assert_eq!(updated.status, UserStatus::Inactive);

        let err = fixture.services.users.update_status("missing", "active").await.unwrap_err();
        assert_matches!(err, ServiceError::NotFound(msg) if msg == "User not found");
    }

    #[tokio::test]
    async fn recipients_filter_status_and_email() {
        let fixture = Fixture::new();
        fixture.user("active").await;
        let inactive = fixture.user("inactive").await;
        fixture.user_with("no-mail", "", "No Mail").await;
        fixture.services.users.update_status(&inactive.id, "inactive").await.unwrap();

        let notify: Vec<_> = fixture
            .services
            .users
            .notification_recipients()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(notify, ["active"]);

        let publication: Vec<_> = fixture
            .services
            .users
            .publication_recipients()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.email)
            .collect();
        assert_eq!(publication, ["inactive@example.com", "active@example.com"]);
    }

    #[tokio::test]
    async fn profile_update_and_delete() {
        let fixture = Fixture::new();
        let user = fixture.user("u1").await;

        let updated = fixture
            .services
            .users
            .update_profile(
                &user.id,
                UserProfileUpdate {
                    job_title: Some("Backend Engineer".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(updated.name, user.name);

        let current = fixture.services.users.current_user(&user).await.unwrap();
        assert!(current.last_login.is_some());

        fixture.services.users.delete_user(&user.id).await.unwrap();
        assert_matches!(
            fixture.services.users.get_user(&user.id).await,
            Err(ServiceError::NotFound(_))
        );
        assert_matches!(
            fixture.services.users.delete_user(&user.id).await,
            Err(ServiceError::NotFound(_))
        );
    }
}
