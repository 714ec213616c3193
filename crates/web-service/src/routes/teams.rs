//! 团队管理接口（管理员）

use crate::auth::RequireAdmin;
use crate::models::common::{AppJson, ErrorReply};
use crate::models::err::AppError;
use crate::models::teams::{TeamCreateRequest, TeamListReply, TeamReply};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;
use validator::Validate;

/// 创建团队
///
/// 团队名不能为空，成员不能重复且不能超过人数上限（默认5人）。
#[utoipa::path(post,
    path = "/teams",
    tag = "teams",
    request_body = TeamCreateRequest,
    responses(
        (status = 201, description = "Team created", body = TeamReply),
        (status = 400, description = "Invalid team", body = ErrorReply)
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(payload): AppJson<TeamCreateRequest>,
) -> Result<(StatusCode, Json<TeamReply>), AppError> {
    debug!("👥 管理员 {} 创建团队 {:#?}", admin.id, payload);

    payload.validate()?;

    let team = state.services.teams.create(&admin, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamReply {
            success: true,
            message: "Team created successfully".to_string(),
            team: team.into(),
        }),
    ))
}

/// 全部团队，按创建时间倒序
#[utoipa::path(get,
    path = "/teams",
    tag = "teams",
    responses(
        (status = 200, description = "Teams", body = TeamListReply)
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<TeamListReply>, AppError> {
    debug!("🔍 查询团队列表");

    let teams = state.services.teams.list().await?;

    Ok(Json(TeamListReply {
        success: true,
        total: teams.len(),
        teams: teams.into_iter().map(Into::into).collect(),
    }))
}
