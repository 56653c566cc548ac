//! HTTP 传输层
//!
//! 通过 `Transport` trait 抽象一次请求的发送，会话只关心状态码和响应体。
//! 生产环境使用基于 reqwest 的 `HttpTransport`，测试时可注入脚本化实现。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use storefront_shared::{LoadError, Result};
use tracing::debug;

/// 一次 API 请求
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// 以 `/` 开头的相对路径
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// API 响应：状态码 + 原始响应体
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// 请求发送抽象
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求并读取完整响应体
    ///
    /// 只有连接、超时、读取等传输层问题返回错误；任何状态码都算作正常响应。
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// 基于 reqwest 的 HTTP 传输
///
/// reqwest::Client 内部带连接池，clone 是廉价操作，多个会话共享同一个实例。
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| LoadError::InvalidTarget(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(LoadError::InvalidTarget(format!(
                "不支持的协议: {}",
                base_url.scheme()
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 拼接完整 URL，保留根地址自带的路径前缀
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        debug!(method = %request.method, url = %url, status, "请求完成");

        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LoadError {
    if err.is_timeout() {
        LoadError::Timeout
    } else {
        LoadError::Transport(err)
    }
}
