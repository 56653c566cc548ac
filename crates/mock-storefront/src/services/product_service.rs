//! 商品服务

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::Value;

use super::StorefrontState;
use crate::models::{Product, ProductInput};
use crate::response::ApiError;
use crate::store::Id;

/// 商品路由，集合路径可配置
pub fn product_routes(path: &str) -> Router<Arc<StorefrontState>> {
    let path = path.trim_matches('/');
    Router::new()
        .route(&format!("/{path}"), get(list_products).post(create_product))
        .route(
            &format!("/{path}/{{id}}"),
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<Arc<StorefrontState>>) -> Json<Value> {
    let products = state.products.list();
    tracing::info!(count = products.len(), "列出商品");
    state.style.list("products retrieved", &products)
}

async fn get_product(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(product_id = id, "获取商品");

    state
        .products
        .get(id)
        .map(|product| state.style.item(&format!("product {id} found"), &product))
        .ok_or_else(|| {
            tracing::warn!(product_id = id, "商品不存在");
            state.style.not_found("product", id)
        })
}

/// 创建商品，ID 总是由服务端分配
async fn create_product(
    State(state): State<Arc<StorefrontState>>,
    Json(input): Json<ProductInput>,
) -> (StatusCode, Json<Value>) {
    let product = state
        .products
        .insert_new(None, |id| Product::from_input(id, input));

    tracing::info!(product_id = product.id, title = %product.title, "创建商品");

    (
        StatusCode::CREATED,
        state.style.item("product created", &product),
    )
}

async fn update_product(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Value>, ApiError> {
    let product = state
        .products
        .update(id, |product| product.apply(input))
        .ok_or_else(|| {
            tracing::warn!(product_id = id, "商品不存在");
            state.style.not_found("product", id)
        })?;

    tracing::info!(product_id = id, "更新商品");
    Ok(state.style.item(&format!("product {id} updated"), &product))
}

async fn delete_product(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
    state.products.remove(id).ok_or_else(|| {
        tracing::warn!(product_id = id, "商品不存在");
        state.style.not_found("product", id)
    })?;

    tracing::info!(product_id = id, "删除商品");
    Ok(StatusCode::NO_CONTENT)
}
