//! storefront-load
//!
//! 商城 API 会话负载工具的命令行入口。

use anyhow::Context;
use clap::Parser;
use load_sessions::cli::{Cli, CommandRunner, Commands, RunOverrides};
use storefront_shared::config::AppConfig;
use storefront_shared::observability::{self, ObservabilityConfig};

const SERVICE_NAME: &str = "storefront-load";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(SERVICE_NAME, cli.config.as_deref()).context("加载配置失败")?;

    // 命令行指定的日志级别优先于配置
    let mut observability_config =
        ObservabilityConfig::from_logging(SERVICE_NAME, &config.observability);
    if let Some(level) = &cli.log_level {
        observability_config = observability_config.with_log_level(level.clone());
    }
    observability::init(&observability_config)?;
    tracing::debug!(environment = %config.environment, "配置已加载");

    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Run {
            profile,
            host,
            users,
            duration,
            seed,
        } => {
            runner
                .run_load(RunOverrides {
                    profile,
                    host,
                    users,
                    duration,
                    seed,
                })
                .await?;
        }
        Commands::Tasks { profile } => {
            runner.list_tasks(profile.as_deref())?;
        }
    }

    Ok(())
}
