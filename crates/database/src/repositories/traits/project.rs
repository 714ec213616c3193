//! 项目仓库 trait 定义
//!
//! 定义项目数据库操作的抽象接口

use crate::models::project::{ProjectCreate, ProjectFilter, ProjectInfo};
use crate::DatabaseResult;
use shared_lib::ProjectStatus;

/// 项目仓库trait定义
///
/// 定义了项目相关的数据库操作接口，支持：
/// - 项目创建
/// - 项目查询（按状态过滤）
/// - 项目状态更新
///
/// 项目不会被物理删除，因此没有删除接口。
#[async_trait::async_trait]
pub trait ProjectRepositoryTrait: Send + Sync + 'static {
    /// 创建新项目
    ///
    /// # 返回值
    /// 返回创建的项目信息，`id` 和时间戳由仓库生成
    async fn create_project(&self, project: ProjectCreate) -> DatabaseResult<ProjectInfo>;

    /// 根据 ID 获取项目信息，不存在时返回 `None`
    async fn get_project_by_id(&self, id: &str) -> DatabaseResult<Option<ProjectInfo>>;

    /// 按条件查询项目列表，按创建时间倒序
    async fn list_projects(&self, filter: ProjectFilter) -> DatabaseResult<Vec<ProjectInfo>>;

    /// 更新项目状态
    ///
    /// # 参数
    /// - `id`: 项目 ID
    /// - `status`: 新状态
    /// - `reason`: 状态变更原因，`None` 会清空之前的原因
    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
        reason: Option<String>,
    ) -> DatabaseResult<ProjectInfo>;
}
