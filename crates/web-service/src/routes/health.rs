//! 健康检查

use crate::models::common::HealthReply;
use crate::AppState;
use axum::extract::State;
use axum::Json;

/// 服务健康状态
///
/// 返回运行时长、运行环境以及当前使用的存储类型，不需要登录。
#[utoipa::path(get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthReply)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReply> {
    let runtime = &state.runtime;

    Json(HealthReply {
        success: true,
        message: "✅ Server is running and healthy".to_string(),
        uptime: runtime.started_at.elapsed().as_secs_f64(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: runtime.environment.clone(),
        store: runtime.store.as_str().to_string(),
    })
}
