//! CLI 模块
//!
//! - `run` - 对目标 API 发起模拟会话负载
//! - `tasks` - 打印某个模板的任务表与权重
//!
//! # 使用示例
//!
//! ```bash
//! # 10 个会话压测本地商城 API 60 秒
//! storefront-load run --profile storefront --host http://localhost:8095 --users 10 --duration 60
//!
//! # 查看网关模板的任务权重
//! storefront-load tasks --profile gateway
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::{CommandRunner, RunOverrides};
