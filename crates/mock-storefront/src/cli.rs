//! CLI 参数定义

use clap::{Parser, ValueEnum};

use crate::MockConfig;
use crate::response::ResponseStyle;

/// 信封格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvelopeArg {
    /// 裸 JSON
    None,
    /// `{"message", "data"}`
    Data,
    /// `{"mensaje", "datos"}`
    Datos,
}

/// 商品集合路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductPathArg {
    Product,
    Products,
}

/// Mock 商城服务
#[derive(Parser, Debug)]
#[command(name = "mock-storefront")]
#[command(version, about = "内存版商城 API 模拟服务")]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// 服务端口
    #[arg(short, long, default_value = "8095")]
    pub port: u16,

    /// 响应信封格式
    #[arg(long, value_enum, default_value = "none")]
    pub envelope: EnvelopeArg,

    /// 商品集合路径
    #[arg(long, value_enum, default_value = "product")]
    pub product_path: ProductPathArg,

    /// 预填充商品数量
    #[arg(long, default_value = "20")]
    pub seed_products: usize,

    /// 预填充用户数量
    #[arg(long, default_value = "10")]
    pub seed_users: usize,

    /// 预填充购物车数量
    #[arg(long, default_value = "7")]
    pub seed_carts: usize,
}

impl Cli {
    pub fn mock_config(&self) -> MockConfig {
        let style = match self.envelope {
            EnvelopeArg::None => ResponseStyle::Bare,
            EnvelopeArg::Data => ResponseStyle::data(),
            EnvelopeArg::Datos => ResponseStyle::datos(),
        };
        let product_path = match self.product_path {
            ProductPathArg::Product => "product",
            ProductPathArg::Products => "products",
        };

        MockConfig {
            style,
            product_path: product_path.to_string(),
            seed_products: self.seed_products,
            seed_users: self.seed_users,
            seed_carts: self.seed_carts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mock-storefront"]);
        assert_eq!(cli.port, 8095);
        let config = cli.mock_config();
        assert_eq!(config.style, ResponseStyle::Bare);
        assert_eq!(config.product_path, "product");
        assert_eq!(config.seed_products, 20);
    }

    #[test]
    fn test_cli_gateway_mode() {
        let cli = Cli::parse_from([
            "mock-storefront",
            "--port",
            "8000",
            "--envelope",
            "datos",
            "--product-path",
            "products",
            "--seed-carts",
            "0",
        ]);
        let config = cli.mock_config();
        assert_eq!(cli.port, 8000);
        assert_eq!(config.style, ResponseStyle::datos());
        assert_eq!(config.product_path, "products");
        assert_eq!(config.seed_carts, 0);
    }

    #[test]
    fn test_cli_rejects_unknown_envelope() {
        assert!(Cli::try_parse_from(["mock-storefront", "--envelope", "xml"]).is_err());
    }
}
