//! Web服务模块
//!
//! 提供 HTTP API 接口、实时订阅和文档服务

use crate::auth::IdentityProvider;
use crate::services::Services;
use color_eyre::eyre::Context;
use color_eyre::Result;
use database::StoreKind;
use shared_lib::ServerConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch::Receiver;
use tracing::{info, warn};

pub mod auth;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::create_app_router;

/// 应用共享状态
///
/// 所有字段都是 `Arc` 或者内部持有 `Arc`，clone成本很低。
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub services: Services,
    pub runtime: Arc<RuntimeInfo>,
}

/// 运行时信息，用于健康检查
#[derive(Debug)]
pub struct RuntimeInfo {
    pub started_at: Instant,
    pub environment: String,
    pub store: StoreKind,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        services: Services,
        environment: impl Into<String>,
        store: StoreKind,
    ) -> Self {
        Self {
            identity,
            services,
            runtime: Arc::new(RuntimeInfo {
                started_at: Instant::now(),
                environment: environment.into(),
                store,
            }),
        }
    }
}

/// 启动 Web 服务
pub async fn start_web_service(state: AppState, config: &ServerConfig, mut shutdown_rx: Receiver<bool>) -> Result<()> {
    let router = routes::create_app_router(state, config);

    let bind_addr = config.bind_addr();
    info!("🚀 启动 Web Service 在 {}", bind_addr);
    info!("📚 接口文档: http://{}/docs", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err_with(|| format!("无法监听地址 {bind_addr}"))?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            if shutdown_rx.changed().await.is_err() {
                warn!("⚠️ 关闭信号通道已断开");
            }
            info!("🛑 Web Service 正在关闭...");
        })
        .await?;

    Ok(())
}
