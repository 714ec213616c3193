//! 申请仓库 trait 定义

use crate::models::application::{ApplicationCreate, ApplicationFilter, ApplicationInfo};
use crate::DatabaseResult;
use shared_lib::ApplicationStatus;

/// 申请仓库trait定义
#[async_trait::async_trait]
pub trait ApplicationRepositoryTrait: Send + Sync + 'static {
    /// 创建申请，初始状态为 `pending`
    ///
    /// 同一个用户对同一个项目只能有一条申请，重复插入返回
    /// [`crate::DatabaseError::UniqueViolation`]。这是判断重复申请的最终依据。
    async fn create_application(&self, application: ApplicationCreate) -> DatabaseResult<ApplicationInfo>;

    async fn find_application_by_id(&self, id: &str) -> DatabaseResult<Option<ApplicationInfo>>;

    /// 查询某个用户对某个项目的申请
    async fn find_application_by_project_and_user(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> DatabaseResult<Option<ApplicationInfo>>;

    /// 按条件查询申请列表，按申请时间倒序
    async fn list_applications(&self, filter: ApplicationFilter) -> DatabaseResult<Vec<ApplicationInfo>>;

    /// 条件更新申请状态（compare-and-set）
    ///
    /// 只有当前状态等于 `expected` 时才会更新为 `target`，并刷新 `updated_at`。
    ///
    /// # 返回值
    /// - `Some(application)`: 更新成功
    /// - `None`: 申请不存在或当前状态已经不是 `expected`
    async fn transition_application_status(
        &self,
        id: &str,
        expected: ApplicationStatus,
        target: ApplicationStatus,
    ) -> DatabaseResult<Option<ApplicationInfo>>;
}
