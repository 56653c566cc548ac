//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// 压测目标配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// 目标 API 根地址，如 http://localhost:8095
    pub host: String,
    pub request_timeout_seconds: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:8095".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// 会话配置
///
/// `profile` 选择会话模板（storefront / gateway），其余字段覆盖模板默认值。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub profile: String,
    /// 思考时间下限（毫秒），为空时使用模板默认值
    pub think_time_min_ms: Option<u64>,
    /// 思考时间上限（毫秒），为空时使用模板默认值
    pub think_time_max_ms: Option<u64>,
    /// 任务权重覆盖，key 为任务标识（如 list_products）
    pub weights: HashMap<String, u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            profile: "storefront".to_string(),
            think_time_min_ms: None,
            think_time_max_ms: None,
            weights: HashMap::new(),
        }
    }
}

/// 本地驱动配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 并发会话数
    pub users: usize,
    pub duration_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            users: 10,
            duration_seconds: 60,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
    /// 是否输出 JSON 结构化日志
    pub json_logs: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub target: TargetConfig,
    pub session: SessionConfig,
    pub run: RunConfig,
    pub observability: LoggingConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 命令行指定的配置文件（必须存在）
    /// 4. 环境变量（STOREFRONT__ 前缀，如 STOREFRONT__TARGET__HOST -> target.host）
    pub fn load(service_name: &str, explicit_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("STOREFRONT_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let mut builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            );

        if let Some(path) = explicit_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let builder = builder.add_source(
            Environment::with_prefix("STOREFRONT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// 从 TOML 字符串解析配置，未出现的字段使用默认值
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
