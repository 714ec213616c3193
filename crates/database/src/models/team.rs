//! 团队数据库模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 团队成员，成员列表以JSON形式整体存储
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: String,
    pub user_name: String,
}

/// 团队信息结构体
#[derive(Debug, Clone, PartialEq)]
pub struct TeamInfo {
    pub id: String,
    pub team_name: String,
    /// 按加入顺序排列的成员
    pub members: Vec<TeamMember>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// 团队创建参数
#[derive(Debug, Clone)]
pub struct TeamCreate {
    pub team_name: String,
    pub members: Vec<TeamMember>,
    pub created_by: String,
}
