//! 命令执行器
//!
//! 把命令行参数合并进已加载的配置，再转成会话模板、传输和负载运行。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use storefront_shared::config::AppConfig;

use crate::profile::SessionProfile;
use crate::runner::{LoadRun, LoadRunConfig, RunSummary};
use crate::transport::HttpTransport;

/// run 子命令的参数覆盖
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub profile: Option<String>,
    pub host: Option<String>,
    pub users: Option<usize>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
}

/// 命令执行器
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 执行 run 命令
    pub async fn run_load(&self, overrides: RunOverrides) -> Result<RunSummary> {
        let config = self.merged(&overrides);

        let profile = SessionProfile::from_config(&config.session)
            .with_context(|| format!("无法构建会话模板 {}", config.session.profile))?;
        let transport = HttpTransport::new(
            &config.target.host,
            Duration::from_secs(config.target.request_timeout_seconds),
        )
        .context("创建 HTTP 客户端失败")?;

        info!(
            profile = %profile.name,
            host = %transport.base_url(),
            users = config.run.users,
            duration_secs = config.run.duration_seconds,
            "准备负载运行"
        );
        println!("目标: {}", transport.base_url());
        println!("按 Ctrl+C 提前结束");

        let run = LoadRun::new(
            profile,
            Arc::new(transport),
            LoadRunConfig {
                users: config.run.users,
                duration: Duration::from_secs(config.run.duration_seconds),
                seed: overrides.seed,
            },
        );

        let summary = run.run().await;
        summary.print_summary();
        Ok(summary)
    }

    /// 执行 tasks 命令
    pub fn list_tasks(&self, profile: Option<&str>) -> Result<()> {
        let mut session = self.config.session.clone();
        if let Some(name) = profile {
            session.profile = name.to_string();
        }
        let profile = SessionProfile::from_config(&session)
            .with_context(|| format!("无法构建会话模板 {}", session.profile))?;

        print!("{}", render_task_table(&profile));
        Ok(())
    }

    fn merged(&self, overrides: &RunOverrides) -> AppConfig {
        let mut config = self.config.clone();
        if let Some(profile) = &overrides.profile {
            config.session.profile = profile.clone();
        }
        if let Some(host) = &overrides.host {
            config.target.host = host.clone();
        }
        if let Some(users) = overrides.users {
            config.run.users = users;
        }
        if let Some(duration) = overrides.duration {
            config.run.duration_seconds = duration;
        }
        config
    }
}

/// 任务表文本
pub fn render_task_table(profile: &SessionProfile) -> String {
    let total = profile.tasks.total_weight().max(1);
    let mut out = String::new();

    out.push_str(&format!(
        "模板: {}  信封字段: {}  商品路径: {}\n",
        profile.name, profile.envelope_key, profile.routes.products
    ));
    out.push_str(&format!(
        "思考时间: {}ms - {}ms\n",
        profile.think_time.min().as_millis(),
        profile.think_time.max().as_millis()
    ));
    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!(
        "{:<22} {:<8} {:>6} {:>8}\n",
        "任务", "方法", "权重", "占比"
    ));
    for task in profile.tasks.tasks() {
        out.push_str(&format!(
            "{:<22} {:<8} {:>6} {:>7.1}%\n",
            task.operation.key(),
            task.operation.method().as_str(),
            task.weight,
            f64::from(task.weight) / total as f64 * 100.0
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(60)));
    out
}
