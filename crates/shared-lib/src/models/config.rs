use color_eyre::eyre::{eyre, Context};
use color_eyre::{Help, Result};
use std::sync::Arc;

/// 默认监听端口，和前端开发环境约定保持一致
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEV_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// HTTP服务配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址，可通过环境变量 `HOST` 调整
    pub host: String,

    /// 监听端口，可通过环境变量 `PORT` 调整
    pub port: u16,

    /// 运行环境（`development` / `production`），来自 `APP_ENV`
    pub environment: String,

    /// 日志级别，来自 `LOG_LEVEL`，未设置时开发环境为`debug`，其他环境为`info`
    pub log_level: String,

    /// 前端地址，邮件中的跳转链接会使用它
    pub frontend_url: String,

    /// 允许跨域访问的来源列表
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// 鉴权配置
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// 校验身份令牌使用的HS256密钥
    pub jwt_secret: String,

    /// 拥有管理员角色的邮箱（小写）
    ///
    /// 用户第一次登录时根据这个列表决定角色
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

/// 邮件发送配置
///
/// `EMAIL_USER` 和 `EMAIL_PASS` 任意一个缺失时不会生成该配置，邮件通知会被自动禁用。
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    /// 发件人显示名称
    pub from_name: String,
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// postgresql数据库链接字符串，未设置时使用内存存储
    pub database_url: Option<String>,

    /// 数据库连接池最大连接数
    pub db_max_connections: u32,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Arc<AppConfig>> {
        // 加载.env文件中的数据注入到环境变量中，方便本地测试
        // 线上环境部署时会直接使用环境变量，不需要.env文件
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!("未加载.env文件: {}", err);
        }

        Ok(Arc::new(Self::from_lookup(|key| std::env::var(key).ok())?))
    }

    /// 从任意键值来源构建配置
    ///
    /// [`AppConfig::load`] 使用环境变量作为来源，测试时可以直接传入闭包。
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("AUTH_JWT_SECRET")
            .ok_or_else(|| eyre!("Can not load AUTH_JWT_SECRET in environment"))
            .suggestion("设置 AUTH_JWT_SECRET 环境变量（身份令牌签名密钥）")?;

        let port = match var("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {port}"))
                .suggestion("PORT 需要是 1~65535 之间的数字")?,
            None => DEFAULT_PORT,
        };

        let environment = var("APP_ENV").unwrap_or_else(|| "development".to_string());
        let log_level = var("LOG_LEVEL").unwrap_or_else(|| {
            if environment.eq_ignore_ascii_case("production") {
                "info".to_string()
            } else {
                "debug".to_string()
            }
        });

        let frontend_url = var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let cors_origins = match var("CORS_ORIGINS") {
            Some(origins) => split_list(&origins),
            None => {
                let mut origins = vec![frontend_url.clone()];
                if frontend_url != DEV_FRONTEND_URL {
                    origins.push(DEV_FRONTEND_URL.to_string());
                }
                origins
            }
        };

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| eyre!("Invalid DB_MAX_CONNECTIONS value: {value}"))
                .suggestion("DB_MAX_CONNECTIONS 需要是大于0的整数")?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let admin_emails = var("ADMIN_EMAILS")
            .map(|list| split_list(&list).into_iter().map(|e| e.to_lowercase()).collect())
            .unwrap_or_default();

        let mail = match (var("EMAIL_USER"), var("EMAIL_PASS")) {
            (Some(username), Some(password)) => Some(MailConfig {
                smtp_host: var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                username,
                password,
                from_name: "Projectify".to_string(),
            }),
            _ => None,
        };

        Ok(AppConfig {
            database_url: var("DATABASE_URL"),
            db_max_connections,
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                environment,
                log_level,
                frontend_url,
                cors_origins,
            },
            auth: AuthConfig {
                jwt_secret,
                admin_emails,
            },
            mail,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
