//! 日志初始化
//!
//! 基于 tracing-subscriber 组装过滤器和格式化层，支持人类可读与 JSON 两种输出。

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::ObservabilityConfig;

/// 初始化 tracing 日志
///
/// 过滤规则优先取 `RUST_LOG`，其次取配置中的级别，都无效时回退到 info。
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let env_filter = build_filter(&config.log_level);

    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn build_filter(level: &str) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(rust_log.as_deref(), level)
}

fn resolve_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_used_without_rust_log() {
        let filter = resolve_filter(None, "load_sessions=debug,warn");
        let rendered = filter.to_string();
        assert!(rendered.contains("load_sessions=debug"), "{rendered}");
        assert!(rendered.contains("warn"), "{rendered}");
    }

    #[test]
    fn test_rust_log_takes_priority() {
        let filter = resolve_filter(Some("mock_storefront=trace"), "warn");
        assert_eq!(filter.to_string(), "mock_storefront=trace");
    }

    #[test]
    fn test_invalid_directives_fall_back() {
        // RUST_LOG 无效时退回配置级别，两者都无效时退回 info
        assert_eq!(resolve_filter(Some("x=nope"), "error").to_string(), "error");
        assert_eq!(resolve_filter(Some("x=nope"), "y=nope").to_string(), "info");
    }
}
