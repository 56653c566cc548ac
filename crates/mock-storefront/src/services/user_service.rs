//! 用户服务

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::Value;

use super::StorefrontState;
use crate::models::{NewUserInput, User, UserInput};
use crate::response::{ApiError, validate};
use crate::store::Id;

pub fn user_routes() -> Router<Arc<StorefrontState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

async fn list_users(State(state): State<Arc<StorefrontState>>) -> Json<Value> {
    let users = state.users.list();
    tracing::info!(count = users.len(), "列出用户");
    state.style.list("users retrieved", &users)
}

async fn get_user(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(user_id = id, "获取用户");

    state
        .users
        .get(id)
        .map(|user| state.style.item(&format!("user {id} found"), &user))
        .ok_or_else(|| {
            tracing::warn!(user_id = id, "用户不存在");
            state.style.not_found("user", id)
        })
}

/// 创建用户
///
/// id、username、email、password 必填；请求中的 id 未被占用时沿用。
async fn create_user(
    State(state): State<Arc<StorefrontState>>,
    Json(input): Json<NewUserInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate(&state.style, &input)?;

    let requested = input.id;
    let user = state
        .users
        .insert_new(requested, |id| User::from_input(id, input));

    tracing::info!(user_id = user.id, username = %user.username, "创建用户");

    Ok((StatusCode::CREATED, state.style.item("user created", &user)))
}

async fn update_user(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
    Json(input): Json<UserInput>,
) -> Result<Json<Value>, ApiError> {
    validate(&state.style, &input)?;

    let user = state
        .users
        .update(id, |user| user.apply(input))
        .ok_or_else(|| {
            tracing::warn!(user_id = id, "用户不存在");
            state.style.not_found("user", id)
        })?;

    tracing::info!(user_id = id, "更新用户");
    Ok(state.style.item(&format!("user {id} updated"), &user))
}

async fn delete_user(
    State(state): State<Arc<StorefrontState>>,
    Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
    state.users.remove(id).ok_or_else(|| {
        tracing::warn!(user_id = id, "用户不存在");
        state.style.not_found("user", id)
    })?;

    tracing::info!(user_id = id, "删除用户");
    Ok(StatusCode::NO_CONTENT)
}
