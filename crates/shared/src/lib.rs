//! 共享库
//!
//! 包含压测工具与模拟服务共用的配置、错误处理、日志初始化代码。

pub mod config;
pub mod error;
pub mod observability;

pub use error::{LoadError, Result};
