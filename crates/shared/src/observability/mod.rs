//! 统一可观测性模块
//!
//! 所有二进制通过单一入口点初始化日志，确保一致的过滤规则和输出格式。

pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use serde::Deserialize;

use crate::config::LoggingConfig;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识日志来源
    pub service_name: String,

    /// 日志级别（如 "info", "debug"）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 是否启用 JSON 格式日志
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 从环境变量加载配置
    pub fn from_env(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level()),
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// 从应用配置的日志段构建
    pub fn from_logging(service_name: &str, logging: &LoggingConfig) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: logging.log_level.clone(),
            json_logs: logging.json_logs,
        }
    }

    /// 覆盖日志级别（命令行参数优先于配置文件）
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use storefront_shared::observability::{init, ObservabilityConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let config = ObservabilityConfig::from_env("storefront-load");
///     init(&config)?;
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_from_logging_and_override() {
        let logging = LoggingConfig {
            log_level: "warn".to_string(),
            json_logs: true,
        };
        let config = ObservabilityConfig::from_logging("storefront-load", &logging)
            .with_log_level("debug");

        assert_eq!(config.service_name, "storefront-load");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
    }
}
