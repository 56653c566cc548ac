//! 本地负载驱动
//!
//! 启动指定数量的会话，共享同一个传输和上报器，运行到时长结束或收到 Ctrl+C。

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{error, info};

use crate::profile::SessionProfile;
use crate::report::{FailureRecord, OperationTally, TallyReporter};
use crate::session::ApiSession;
use crate::tasks::Operation;
use crate::transport::Transport;

/// 负载运行配置
#[derive(Debug, Clone)]
pub struct LoadRunConfig {
    /// 并发会话数
    pub users: usize,
    /// 运行时长
    pub duration: Duration,
    /// 随机种子，设置后第 i 个会话使用 seed + i
    pub seed: Option<u64>,
}

impl Default for LoadRunConfig {
    fn default() -> Self {
        Self {
            users: 10,
            duration: Duration::from_secs(60),
            seed: None,
        }
    }
}

/// 运行结果汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub profile: String,
    pub users: usize,
    pub elapsed: Duration,
    pub operations: Vec<(Operation, OperationTally)>,
    pub totals: OperationTally,
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    pub fn throughput(&self) -> f64 {
        if self.elapsed.as_secs_f64() == 0.0 {
            return 0.0;
        }
        self.totals.requests as f64 / self.elapsed.as_secs_f64()
    }

    pub fn print_summary(&self) {
        println!("\n========== 负载运行结果 ==========");
        println!("模板: {}", self.profile);
        println!("会话数: {}", self.users);
        println!("运行时长: {:.1}s", self.elapsed.as_secs_f64());
        println!("{}", "-".repeat(72));
        println!(
            "{:<22} {:>8} {:>8} {:>8} {:>10} {:>10}",
            "操作", "请求", "成功", "失败", "成功率", "平均延迟"
        );
        for (operation, tally) in &self.operations {
            println!(
                "{:<22} {:>8} {:>8} {:>8} {:>9.2}% {:>8.2}ms",
                operation.name(),
                tally.requests,
                tally.successes,
                tally.failures,
                tally.success_rate(),
                tally.avg_latency_ms()
            );
        }
        println!("{}", "-".repeat(72));
        println!(
            "{:<22} {:>8} {:>8} {:>8} {:>9.2}% {:>8.2}ms",
            "合计",
            self.totals.requests,
            self.totals.successes,
            self.totals.failures,
            self.totals.success_rate(),
            self.totals.avg_latency_ms()
        );
        println!("吞吐量: {:.2} req/s", self.throughput());

        if !self.failures.is_empty() {
            println!("\n失败明细（最多 {} 条）:", self.failures.len());
            for failure in &self.failures {
                println!("  {}", failure);
            }
        }
        println!("==================================\n");
    }
}

/// 负载运行器
pub struct LoadRun {
    profile: Arc<SessionProfile>,
    transport: Arc<dyn Transport>,
    reporter: TallyReporter,
    config: LoadRunConfig,
}

impl LoadRun {
    pub fn new(
        profile: SessionProfile,
        transport: Arc<dyn Transport>,
        config: LoadRunConfig,
    ) -> Self {
        Self {
            profile: Arc::new(profile),
            transport,
            reporter: TallyReporter::new(),
            config,
        }
    }

    pub fn reporter(&self) -> &TallyReporter {
        &self.reporter
    }

    /// 运行到配置的时长结束，或提前收到 Ctrl+C
    pub async fn run(&self) -> RunSummary {
        let duration = self.config.duration;
        self.run_until(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = shutdown_signal() => {
                    info!("收到中断信号，提前结束");
                }
            }
        })
        .await
    }

    /// 运行到 stop 完成
    pub async fn run_until<F>(&self, stop: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let started = Instant::now();

        info!(
            profile = %self.profile.name,
            users = self.config.users,
            duration_secs = self.config.duration.as_secs(),
            "开始负载运行"
        );

        let handles: Vec<_> = (0..self.config.users)
            .map(|index| {
                let session = self.session(index);
                tokio::spawn(session.run(shutdown_rx.clone()))
            })
            .collect();

        stop.await;
        // 接收端全部退出时 send 返回错误，此时无需通知
        let _ = shutdown_tx.send(true);

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "会话任务异常退出");
            }
        }

        let summary = self.summary(started.elapsed());
        info!(
            requests = summary.totals.requests,
            failures = summary.totals.failures,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "负载运行结束"
        );
        summary
    }

    fn session(&self, index: usize) -> ApiSession {
        let reporter = Arc::new(self.reporter.clone());
        match self.config.seed {
            Some(seed) => ApiSession::with_seed(
                index,
                self.profile.clone(),
                self.transport.clone(),
                reporter,
                seed.wrapping_add(index as u64),
            ),
            None => ApiSession::new(
                index,
                self.profile.clone(),
                self.transport.clone(),
                reporter,
            ),
        }
    }

    fn summary(&self, elapsed: Duration) -> RunSummary {
        RunSummary {
            profile: self.profile.name.clone(),
            users: self.config.users,
            elapsed,
            operations: self.reporter.snapshot(),
            totals: self.reporter.totals(),
            failures: self.reporter.failures(),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "监听 Ctrl+C 失败");
        // 无法监听信号时只靠时长结束
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskDescriptor, TaskSet};
    use crate::testing::ScriptedTransport;

    #[tokio::test(start_paused = true)]
    async fn test_run_spawns_sessions_and_collects_reports() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.set_default_response(200, r#"{"data":[{"id":1},{"id":2}]}"#);
        let tasks = TaskSet::new(vec![
            TaskDescriptor::new(Operation::ListProducts, 1),
            TaskDescriptor::new(Operation::GetProduct, 1),
        ])
        .unwrap();
        let profile = SessionProfile::storefront().with_tasks(tasks);

        let run = LoadRun::new(
            profile,
            transport.clone(),
            LoadRunConfig {
                users: 3,
                duration: Duration::from_secs(30),
                seed: Some(7),
            },
        );
        let summary = run.run_until(tokio::time::sleep(Duration::from_secs(30))).await;

        assert_eq!(summary.users, 3);
        assert_eq!(summary.profile, "storefront");
        // 每个会话至少有 on_start 这一次 list products
        assert!(summary.totals.requests >= 3 * 6);
        assert_eq!(summary.totals.failures, 0);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.totals.requests, transport.requests().len() as u64);
        assert!(summary.operations.iter().all(|(_, tally)| tally.requests > 0));
    }

    #[tokio::test]
    async fn test_zero_users_finishes_immediately() {
        let transport = Arc::new(ScriptedTransport::new());
        let run = LoadRun::new(
            SessionProfile::gateway(),
            transport,
            LoadRunConfig {
                users: 0,
                ..Default::default()
            },
        );
        let summary = run.run_until(async {}).await;
        assert_eq!(summary.totals.requests, 0);
        assert_eq!(summary.throughput(), 0.0);
    }
}
