use color_eyre::eyre::Context;
use color_eyre::{Help, Result};
use database::{initialize_database, ChangeFeed, Repositories};
use mail_service::{NoopSender, NotificationSender, SmtpSender};
use shared_lib::AppConfig;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use web_service::auth::JwtIdentityProvider;
use web_service::services::Services;
use web_service::{start_web_service, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = AppConfig::load()?;

    let level = Level::from_str(&config.server.log_level)
        .with_context(|| format!("Invalid LOG_LEVEL value: {}", config.server.log_level))
        .suggestion("LOG_LEVEL 可选值: trace / debug / info / warn / error")?;
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 启动 Projectify 后端 ({})", config.server.environment);

    // 未配置数据库时使用内存存储，重启后数据丢失
    let repositories = match &config.database_url {
        Some(_) => {
            let pool = initialize_database(&config)
                .await
                .context("Connect to postgresql database")?;
            Repositories::postgres(pool, ChangeFeed::default())
        }
        None => {
            warn!("⚠️ 未设置 DATABASE_URL，使用内存存储");
            Repositories::in_memory()
        }
    };

    let sender: Arc<dyn NotificationSender> = match &config.mail {
        Some(mail) => {
            info!("📧 邮件通知已启用: {}", mail.username);
            Arc::new(SmtpSender::new(mail).context("Build smtp transport")?)
        }
        None => {
            warn!("⚠️ 未设置 EMAIL_USER / EMAIL_PASS，邮件通知已禁用");
            Arc::new(NoopSender)
        }
    };

    let services = Services::new(&repositories, sender, &config);
    let state = AppState::new(
        Arc::new(JwtIdentityProvider::new(&config.auth.jwt_secret)),
        services,
        config.server.environment.clone(),
        repositories.kind,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("🛑 收到退出信号"),
            Err(e) => error!("❌ 监听退出信号失败: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    start_web_service(state, &config.server, shutdown_rx).await?;

    info!("👋 服务已退出");
    Ok(())
}
