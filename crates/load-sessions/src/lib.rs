//! Load Sessions
//!
//! 模拟商城 REST API 客户端的会话负载库。
//!
//! 每个会话代表一个模拟用户：按权重随机执行商品、购物车、用户和登录相关的请求，
//! 从响应中学习实体 ID 并在后续请求中复用，同时把每个请求的结果上报给 `Reporter`。
//!
//! # 主要模块
//!
//! - `session`: 会话状态与会话循环
//! - `tasks`: 操作定义与带权任务集
//! - `profile`: 会话模板（storefront / gateway）
//! - `envelope`: 响应信封解析
//! - `payloads`: 请求体模板
//! - `transport`: HTTP 传输抽象
//! - `report`: 结果上报
//! - `runner`: 本地负载驱动
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use load_sessions::profile::SessionProfile;
//! use load_sessions::runner::{LoadRun, LoadRunConfig};
//! use load_sessions::transport::HttpTransport;
//!
//! # async fn demo() -> storefront_shared::Result<()> {
//! let transport = HttpTransport::new("http://localhost:8095", Duration::from_secs(30))?;
//! let run = LoadRun::new(
//!     SessionProfile::storefront(),
//!     Arc::new(transport),
//!     LoadRunConfig::default(),
//! );
//! run.run().await.print_summary();
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod envelope;
pub mod payloads;
pub mod profile;
pub mod report;
pub mod runner;
pub mod session;
pub mod tasks;
pub mod transport;

#[cfg(test)]
mod testing;

pub use profile::SessionProfile;
pub use report::{FailureRecord, Reporter, TallyReporter};
pub use session::{ApiSession, TaskOutcome};
pub use tasks::Operation;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
