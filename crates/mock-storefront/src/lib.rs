//! Mock Storefront
//!
//! 内存版商城 API，用于本地运行负载会话和集成测试。
//!
//! # 主要模块
//!
//! - `models`: 商品、购物车、用户模型
//! - `store`: 内存存储
//! - `response`: 裸 JSON / 信封响应格式
//! - `services`: REST 路由
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use mock_storefront::{MockConfig, serve};
//! use mock_storefront::response::ResponseStyle;
//!
//! # async fn demo() -> std::io::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
//! let config = MockConfig {
//!     style: ResponseStyle::datos(),
//!     product_path: "products".to_string(),
//!     ..Default::default()
//! };
//! serve(listener, config, std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod models;
pub mod response;
pub mod services;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use response::ResponseStyle;
use services::StorefrontState;

/// 模拟服务配置
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub style: ResponseStyle,
    /// 商品集合路径，`product` 或 `products`
    pub product_path: String,
    pub seed_products: usize,
    pub seed_users: usize,
    pub seed_carts: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            style: ResponseStyle::Bare,
            product_path: "product".to_string(),
            seed_products: 0,
            seed_users: 0,
            seed_carts: 0,
        }
    }
}

/// 按配置构建状态（含预填充）与路由
pub fn app(config: &MockConfig) -> (Router, Arc<StorefrontState>) {
    let state = Arc::new(StorefrontState::new(config.style.clone()));
    state.seed(config.seed_products, config.seed_users, config.seed_carts);
    (services::router(state.clone(), &config.product_path), state)
}

/// 在给定监听器上运行服务，直到 `shutdown` 完成
pub async fn serve<F>(listener: TcpListener, config: MockConfig, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (router, _) = app(&config);
    let addr = listener.local_addr()?;

    info!(
        %addr,
        style = %config.style,
        product_path = %config.product_path,
        "Mock 商城服务已启动"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
