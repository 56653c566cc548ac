//! 测试用的脚本化传输：按顺序返回预置响应，并记录收到的请求

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use storefront_shared::{LoadError, Result};

use crate::transport::{ApiRequest, ApiResponse, Transport};

enum Scripted {
    Response(ApiResponse),
    Error,
}

#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<Option<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.queue
            .lock()
            .push_back(Scripted::Response(ApiResponse::new(status, body)));
    }

    pub fn push_error(&self) {
        self.queue.lock().push_back(Scripted::Error);
    }

    /// 队列耗尽后返回的响应
    pub fn set_default_response(&self, status: u16, body: &str) {
        *self.fallback.lock() = Some(ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().push(request.clone());

        let next = self.queue.lock().pop_front();
        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error) => Err(LoadError::Timeout),
            None => self
                .fallback
                .lock()
                .clone()
                .ok_or_else(|| LoadError::Internal(format!("没有预置响应: {}", request.path))),
        }
    }
}
