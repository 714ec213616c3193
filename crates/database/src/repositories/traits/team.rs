use crate::models::team::{TeamCreate, TeamInfo};
use crate::DatabaseResult;

/// 团队仓库trait定义
#[async_trait::async_trait]
pub trait TeamRepositoryTrait: Send + Sync + 'static {
    /// 创建团队，团队和成员作为一条记录整体写入
    async fn create_team(&self, team: TeamCreate) -> DatabaseResult<TeamInfo>;

    /// 查询全部团队，按创建时间倒序
    async fn list_teams(&self) -> DatabaseResult<Vec<TeamInfo>>;
}
