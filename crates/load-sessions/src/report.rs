//! 请求结果上报
//!
//! 每个实际发出的请求恰好产生一条记录：成功或带标签的失败。
//! 被跳过的任务（缺少已知 ID）不产生记录。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::session::state::EntityId;
use crate::tasks::Operation;

/// 最多保留的失败明细条数
const MAX_FAILURE_SAMPLES: usize = 100;

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// 状态码不在成功集合内
    Status(u16),
    /// 连接、超时等传输层错误
    Transport(String),
}

/// 失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub operation: Operation,
    pub entity_id: Option<EntityId>,
    pub cause: FailureCause,
}

impl FailureRecord {
    pub fn status(operation: Operation, entity_id: Option<EntityId>, status: u16) -> Self {
        Self {
            operation,
            entity_id,
            cause: FailureCause::Status(status),
        }
    }

    pub fn transport(
        operation: Operation,
        entity_id: Option<EntityId>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            operation,
            entity_id,
            cause: FailureCause::Transport(error.to_string()),
        }
    }

    /// 失败标签，如 `get product 7: HTTP 404`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(id) = self.entity_id {
            write!(f, " {}", id)?;
        }
        match &self.cause {
            FailureCause::Status(status) => write!(f, ": HTTP {}", status),
            FailureCause::Transport(error) => write!(f, ": {}", error),
        }
    }
}

/// 结果上报接口
pub trait Reporter: Send + Sync {
    fn record_success(&self, operation: Operation, elapsed: Duration);

    fn record_failure(&self, failure: FailureRecord, elapsed: Duration);
}

/// 单个操作的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationTally {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_latency: Duration,
}

impl OperationTally {
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.successes as f64 / self.requests as f64 * 100.0
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.total_latency.as_secs_f64() * 1000.0 / self.requests as f64
    }
}

/// 并发计数的上报实现
///
/// clone 后共享同一份数据，可同时交给多个会话使用。
#[derive(Debug, Clone, Default)]
pub struct TallyReporter {
    tallies: Arc<DashMap<Operation, OperationTally>>,
    failures: Arc<Mutex<Vec<FailureRecord>>>,
}

impl TallyReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, operation: Operation) -> OperationTally {
        self.tallies
            .get(&operation)
            .map(|entry| *entry.value())
            .unwrap_or_default()
    }

    /// 按任务表顺序返回有请求的操作统计
    pub fn snapshot(&self) -> Vec<(Operation, OperationTally)> {
        let mut rows: Vec<_> = self
            .tallies
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        rows.sort_by_key(|(operation, _)| *operation);
        rows
    }

    pub fn totals(&self) -> OperationTally {
        self.tallies
            .iter()
            .fold(OperationTally::default(), |mut acc, entry| {
                acc.requests += entry.requests;
                acc.successes += entry.successes;
                acc.failures += entry.failures;
                acc.total_latency += entry.total_latency;
                acc
            })
    }

    /// 保留的失败明细（最多 100 条）
    pub fn failures(&self) -> Vec<FailureRecord> {
        self.failures.lock().clone()
    }
}

impl Reporter for TallyReporter {
    fn record_success(&self, operation: Operation, elapsed: Duration) {
        let mut tally = self.tallies.entry(operation).or_default();
        tally.requests += 1;
        tally.successes += 1;
        tally.total_latency += elapsed;
    }

    fn record_failure(&self, failure: FailureRecord, elapsed: Duration) {
        {
            let mut tally = self.tallies.entry(failure.operation).or_default();
            tally.requests += 1;
            tally.failures += 1;
            tally.total_latency += elapsed;
        }

        let mut failures = self.failures.lock();
        if failures.len() < MAX_FAILURE_SAMPLES {
            failures.push(failure);
        }
    }
}
