//! 统一错误处理模块
//!
//! 定义压测工具共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 请求失败（非成功状态码）不是错误，由会话上报给 Reporter。

use thiserror::Error;

/// 压测错误类型
#[derive(Debug, Error)]
pub enum LoadError {
    // ==================== 配置错误 ====================
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("未知的会话模板: {0}")]
    UnknownProfile(String),

    #[error("未知的任务: {0}")]
    UnknownOperation(String),

    #[error("任务权重无效: {0}")]
    InvalidWeights(String),

    #[error("思考时间范围无效: min={min_ms}ms max={max_ms}ms")]
    InvalidThinkTime { min_ms: u64, max_ms: u64 },

    // ==================== 传输错误 ====================
    #[error("无效的目标地址: {0}")]
    InvalidTarget(String),

    #[error("HTTP 请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("请求超时")]
    Timeout,

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, LoadError>;

impl LoadError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::UnknownProfile(_) => "UNKNOWN_PROFILE",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::InvalidWeights(_) => "INVALID_WEIGHTS",
            Self::InvalidThinkTime { .. } => "INVALID_THINK_TIME",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为请求阶段的错误（计入失败记录而非中止会话）
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}
