//! 登录服务

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde_json::Value;
use uuid::Uuid;

use super::{DEMO_PASSWORD, DEMO_USERNAME, StorefrontState};
use crate::models::LoginInput;
use crate::response::{ApiError, validate};

pub fn auth_routes() -> Router<Arc<StorefrontState>> {
    Router::new().route("/auth/login", post(login))
}

/// 登录
///
/// 示例凭据或已存在用户的用户名/密码返回 token，否则 401。
async fn login(
    State(state): State<Arc<StorefrontState>>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    validate(&state.style, &input)?;

    let username = input.username.unwrap_or_default();
    let password = input.password.unwrap_or_default();

    let is_demo = username == DEMO_USERNAME && password == DEMO_PASSWORD;
    let known = is_demo
        || !state
            .users
            .list_by(|user| user.username == username && user.password == password)
            .is_empty();

    if !known {
        tracing::warn!(username = %username, "登录失败");
        return Err(state
            .style
            .error(StatusCode::UNAUTHORIZED, "invalid credentials"));
    }

    tracing::info!(username = %username, "登录成功");

    let Json(mut body) = state.style.message("login successful");
    if let Value::Object(map) = &mut body {
        map.insert(
            "token".to_string(),
            Value::String(Uuid::new_v4().simple().to_string()),
        );
    }
    Ok(Json(body))
}
