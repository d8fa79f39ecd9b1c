use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，配置文件与环境变量按需覆盖
            .set_default("app.system_name", "homework-portal")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 8)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 16 * 1024 * 1024)?
            .set_default("database.url", "sqlite://homework.db?mode=rwc")?
            .set_default("database.pool_size", 8)?
            .set_default("database.timeout", 10)?
            .set_default("session.cookie_name", "portal_session")?
            .set_default("session.ttl", 86400)?
            .set_default("session.max_capacity", 10000)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 16 * 1024 * 1024)?
            .set_default(
                "upload.allowed_extensions",
                vec!["txt", "pdf", "doc", "docx"],
            )?
            .set_default("grader.enabled", false)?
            .set_default("grader.api_key", "")?
            .set_default(
                "grader.api_url",
                "https://api.deepseek.com/v1/chat/completions",
            )?
            .set_default("grader.model", "deepseek-coder")?
            // 低温度保证评分一致性
            .set_default("grader.temperature", 0.1)?
            .set_default("grader.max_tokens", 2000)?
            .set_default("grader.timeout", 30)?
            .set_default("grader.max_retries", 3)?
            .set_default("grader.retry_delay", 2)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("PORTAL")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("grader.enabled", std::env::var("GRADER_ENABLED").ok())?
            .set_override_option("grader.api_key", std::env::var("MY_DEEPSEEK_API_KEY").ok())?
            .set_override_option("grader.api_url", std::env::var("GRADER_API_URL").ok())?
            .set_override_option("grader.model", std::env::var("GRADER_MODEL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;

        Ok(app_config)
    }

    /// 校验配置，不满足则拒绝启动
    fn validate(&self) -> Result<(), ConfigError> {
        if self.grader.enabled && self.grader.api_key.is_empty() {
            return Err(ConfigError::Message(
                "评分功能已启用但未配置 API Key，请设置 MY_DEEPSEEK_API_KEY 环境变量".to_string(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
