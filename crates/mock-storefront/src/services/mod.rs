//! Mock 商城服务
//!
//! 商品、购物车、用户和登录的 REST API，数据全部保存在内存中。

pub mod auth_service;
pub mod cart_service;
pub mod product_service;
pub mod user_service;


use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tracing::info;

use crate::models::{Cart, Product, User};
use crate::response::ResponseStyle;
use crate::store::MemoryStore;

pub use auth_service::auth_routes;
pub use cart_service::cart_routes;
pub use product_service::product_routes;
pub use user_service::user_routes;

/// 预置的示例登录凭据，任何数据下都能登录成功
pub const DEMO_USERNAME: &str = "mor_2314";
pub const DEMO_PASSWORD: &str = "83r5^_";

/// 服务共享状态
pub struct StorefrontState {
    pub products: MemoryStore<Product>,
    pub carts: MemoryStore<Cart>,
    pub users: MemoryStore<User>,
    pub style: ResponseStyle,
}

impl Default for StorefrontState {
    fn default() -> Self {
        Self::new(ResponseStyle::Bare)
    }
}

impl StorefrontState {
    pub fn new(style: ResponseStyle) -> Self {
        Self {
            products: MemoryStore::new(),
            carts: MemoryStore::new(),
            users: MemoryStore::new(),
            style,
        }
    }

    /// 预填充随机数据，购物车引用已填充的商品和用户
    pub fn seed(&self, products: usize, users: usize, carts: usize) {
        for _ in 0..products {
            self.products.insert_new(None, Product::random);
        }
        for _ in 0..users {
            self.users.insert_new(None, User::random);
        }

        let product_ids = self.products.ids();
        let user_ids = self.users.ids();
        for _ in 0..carts {
            self.carts
                .insert_new(None, |id| Cart::random(id, &product_ids, &user_ids));
        }

        info!(
            products = self.products.count(),
            users = self.users.count(),
            carts = self.carts.count(),
            "数据预填充完成"
        );
    }
}

/// 组装完整路由
///
/// `product_path` 为商品集合路径（不含斜杠），如 `product` 或 `products`。
pub fn router(state: Arc<StorefrontState>, product_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(product_routes(product_path))
        .merge(cart_routes())
        .merge(user_routes())
        .merge(auth_routes())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "mock-storefront",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
