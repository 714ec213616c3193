//! 实时数据订阅（SSE）
//!
//! 连接建立后立即推送一次 `snapshot` 事件，之后数据每次变更都会推送新的完整快照。
//! 客户端断开连接即取消订阅。

use crate::auth::AuthUser;
use crate::models::applications::ApplicationListReply;
use crate::models::common::{ErrorReply, SubscriptionQuery};
use crate::models::err::AppError;
use crate::models::projects::ProjectListReply;
use crate::models::teams::TeamListReply;
use crate::models::users::UserListReply;
use crate::services::{ServiceResult, Snapshot, Topic};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, warn};

/// 订阅集合
///
/// `collection` 可选值：`projects`、`my-applications`，以及管理员专用的
/// `applications`、`users`、`teams`。
#[utoipa::path(get,
    path = "/subscriptions/{collection}",
    tag = "subscriptions",
    params(
        ("collection" = String, Path, description = "projects | applications | my-applications | users | teams"),
        SubscriptionQuery
    ),
    responses(
        (status = 200, description = "Stream of snapshots", content_type = "text/event-stream", body = String),
        (status = 400, description = "Unknown collection", body = ErrorReply),
        (status = 403, description = "Admin access required", body = ErrorReply)
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(collection): Path<String>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    debug!("📡 用户 {} 订阅 {} {:?}", user.id, collection, query);

    let topic = Topic::parse(&collection, query.project_id)?;
    let snapshots = state.services.subscriptions.subscribe(user, topic)?;

    let events = snapshots.map(|snapshot| Ok::<_, Infallible>(snapshot_event(snapshot)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// 快照序列化为和列表接口相同的json结构
fn snapshot_event(snapshot: ServiceResult<Snapshot>) -> Event {
    let event = match snapshot {
        Ok(Snapshot::Projects(projects)) => Event::default().event("snapshot").json_data(ProjectListReply {
            success: true,
            total: projects.len(),
            projects: projects.into_iter().map(Into::into).collect(),
        }),
        Ok(Snapshot::Applications(applications)) => {
            Event::default().event("snapshot").json_data(ApplicationListReply {
                success: true,
                applications: applications.into_iter().map(Into::into).collect(),
            })
        }
        Ok(Snapshot::Users(users)) => Event::default().event("snapshot").json_data(UserListReply {
            success: true,
            total: users.len(),
            users: users.into_iter().map(Into::into).collect(),
        }),
        Ok(Snapshot::Teams(teams)) => Event::default().event("snapshot").json_data(TeamListReply {
            success: true,
            total: teams.len(),
            teams: teams.into_iter().map(Into::into).collect(),
        }),
        Err(err) => {
            warn!("⚠️ 订阅查询失败: {}", err);
            Event::default().event("error").json_data(ErrorReply::new(err.to_string()))
        }
    };

    event.unwrap_or_else(|err| {
        warn!("⚠️ 快照序列化失败: {}", err);
        Event::default().event("error").data("snapshot serialization failed")
    })
}
