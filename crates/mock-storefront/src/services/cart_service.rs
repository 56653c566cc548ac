//! 购物车服务

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;

use super::StorefrontState;
use crate::models::cart::to_lines;
use crate::models::{Cart, CartInput, CartProductsInput, NewCartInput};
use crate::response::{ApiError, validate};
use crate::store::Id;

pub fn cart_routes() -> Router<Arc<StorefrontState>> {
    Router::new()
        .route("/carts", get(list_carts).post(create_cart))
        .route(
            "/carts/{id}",
            get(get_cart).put(update_cart).delete(delete_cart),
        )
        .route("/carts/{id}/product", post(add_products))
        .route("/carts/user/{user_id}", get(list_user_carts))
}

async fn list_carts(State(state): State<Arc<StorefrontState>>) -> Json<Value> {
    let carts = state.carts.list();
    tracing::info!(count = carts.len(), "列出购物车");
    state.style.list("carts retrieved", &carts)
}

async fn list_user_carts(
    State(state): State<Arc<StorefrontState>>,
    Path(user_id): Path<Id>,
) -> Json<Value> {
    let carts = state.carts.list_by(|cart| cart.user_id == user_id);
    tracing::info!(user_id, count = carts.len(), "列出用户购物车");
    state.style.list("user carts retrieved", &carts)
}

async fn get_cart(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(cart_id = id, "获取购物车");

    state
        .carts
        .get(id)
        .map(|cart| state.style.item(&format!("cart {id} found"), &cart))
        .ok_or_else(|| {
            tracing::warn!(cart_id = id, "购物车不存在");
            state.style.not_found("cart", id)
        })
}

/// 创建购物车
///
/// 请求中的 id 未被占用时沿用，否则分配新 ID。
async fn create_cart(
    State(state): State<Arc<StorefrontState>>,
    Json(input): Json<NewCartInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate(&state.style, &input)?;

    let user_id = input.user_id.unwrap_or_default();
    let date = input
        .date
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());
    let products = to_lines(input.products.as_deref().unwrap_or_default());

    let cart = state.carts.insert_new(input.id, |id| Cart {
        id,
        user_id,
        date,
        products,
    });

    tracing::info!(cart_id = cart.id, user_id = cart.user_id, "创建购物车");

    Ok((StatusCode::CREATED, state.style.item("cart created", &cart)))
}

async fn update_cart(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
    Json(input): Json<CartInput>,
) -> Result<Json<Value>, ApiError> {
    validate(&state.style, &input)?;

    let cart = state
        .carts
        .update(id, |cart| {
            if let Some(user_id) = input.user_id {
                cart.user_id = user_id;
            }
            if let Some(date) = input.date {
                cart.date = date;
            }
            if let Some(lines) = &input.products {
                cart.products = to_lines(lines);
            }
        })
        .ok_or_else(|| {
            tracing::warn!(cart_id = id, "购物车不存在");
            state.style.not_found("cart", id)
        })?;

    tracing::info!(cart_id = id, "更新购物车");
    Ok(state.style.item(&format!("cart {id} updated"), &cart))
}

async fn delete_cart(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
    state.carts.remove(id).ok_or_else(|| {
        tracing::warn!(cart_id = id, "购物车不存在");
        state.style.not_found("cart", id)
    })?;

    tracing::info!(cart_id = id, "删除购物车");
    Ok(StatusCode::NO_CONTENT)
}

/// 向购物车追加商品，已有条目保持不变
async fn add_products(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
    Json(input): Json<CartProductsInput>,
) -> Result<Json<Value>, ApiError> {
    validate(&state.style, &input)?;

    let added = to_lines(input.products.as_deref().unwrap_or_default());
    let count = added.len();

    let cart = state
        .carts
        .update(id, |cart| cart.products.extend(added))
        .ok_or_else(|| {
            tracing::warn!(cart_id = id, "购物车不存在");
            state.style.not_found("cart", id)
        })?;

    tracing::info!(cart_id = id, added = count, "购物车追加商品");
    Ok(state.style.item(&format!("products added to cart {id}"), &cart))
}
