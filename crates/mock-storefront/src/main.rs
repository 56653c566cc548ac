//! Mock Storefront
//!
//! 模拟商城服务的命令行入口。

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use mock_storefront::cli::Cli;
use storefront_shared::observability::{self, ObservabilityConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let observability_config =
        ObservabilityConfig::from_env("mock-storefront").with_log_level(cli.log_level.clone());
    observability::init(&observability_config)?;

    let config = cli.mock_config();
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(addr).await.context("绑定端口失败")?;

    info!("可用端点:");
    info!("  GET /health - 健康检查");
    info!("  GET/POST /{} - 商品", config.product_path);
    info!("  GET/POST /carts - 购物车");
    info!("  GET/POST /users - 用户");
    info!("  POST /auth/login - 登录");
    info!("按 Ctrl+C 停止服务");

    mock_storefront::serve(listener, config, shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("Mock 商城服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "监听 Ctrl+C 失败");
    }
}
