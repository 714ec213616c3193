//! 用户仓库 trait 定义

use crate::models::user::{UserCreate, UserFilter, UserInfo, UserProfileUpdate};
use crate::DatabaseResult;
use shared_lib::UserStatus;

#[async_trait::async_trait]
pub trait UserRepositoryTrait: Send + Sync + 'static {
    async fn get_user_by_id(&self, id: &str) -> DatabaseResult<Option<UserInfo>>;

    /// 用户不存在时创建，已存在时直接返回已有记录
    ///
    /// 并发的首次登录只会产生一条用户记录，返回值中的 `bool`
    /// 只有真正插入记录的那次调用为 `true`。
    async fn create_user_if_absent(&self, user: UserCreate) -> DatabaseResult<(UserInfo, bool)>;

    /// 按条件查询用户列表，按创建时间倒序
    async fn list_users(&self, filter: UserFilter) -> DatabaseResult<Vec<UserInfo>>;

    async fn update_user_status(&self, id: &str, status: UserStatus) -> DatabaseResult<UserInfo>;

    async fn update_user_profile(&self, id: &str, update: UserProfileUpdate) -> DatabaseResult<UserInfo>;

    /// 记录最近登录时间
    async fn touch_last_login(&self, id: &str) -> DatabaseResult<UserInfo>;

    /// 删除用户，返回被删除的用户信息
    async fn delete_user(&self, id: &str) -> DatabaseResult<UserInfo>;
}
