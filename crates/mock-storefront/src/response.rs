//! 响应格式
//!
//! 模拟服务既可以像上游商城一样返回裸 JSON，
//! 也可以像网关一样把数据包在信封字段里并附带一条提示消息。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// handler 的错误返回
pub type ApiError = (StatusCode, Json<Value>);

/// 响应格式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseStyle {
    /// 直接返回数组/对象
    #[default]
    Bare,
    /// `{message_key: "...", data_key: ...}`
    Enveloped {
        data_key: String,
        message_key: String,
    },
}

impl ResponseStyle {
    /// `{"message": ..., "data": ...}`
    pub fn data() -> Self {
        Self::Enveloped {
            data_key: "data".to_string(),
            message_key: "message".to_string(),
        }
    }

    /// 网关风格：`{"mensaje": ..., "datos": ...}`
    pub fn datos() -> Self {
        Self::Enveloped {
            data_key: "datos".to_string(),
            message_key: "mensaje".to_string(),
        }
    }

    pub fn data_key(&self) -> Option<&str> {
        match self {
            Self::Bare => None,
            Self::Enveloped { data_key, .. } => Some(data_key),
        }
    }

    fn message_key(&self) -> &str {
        match self {
            Self::Bare => "message",
            Self::Enveloped { message_key, .. } => message_key,
        }
    }

    /// 单个实体
    pub fn item<T: Serialize>(&self, message: &str, item: &T) -> Json<Value> {
        let value = to_value(item);
        match self {
            Self::Bare => Json(value),
            Self::Enveloped {
                data_key,
                message_key,
            } => {
                let mut body = Map::new();
                body.insert(message_key.clone(), Value::String(message.to_string()));
                body.insert(data_key.clone(), value);
                Json(Value::Object(body))
            }
        }
    }

    /// 实体列表，信封格式额外带 `total`
    pub fn list<T: Serialize>(&self, message: &str, items: &[T]) -> Json<Value> {
        let values = Value::Array(items.iter().map(to_value).collect());
        match self {
            Self::Bare => Json(values),
            Self::Enveloped {
                data_key,
                message_key,
            } => {
                let mut body = Map::new();
                body.insert(message_key.clone(), Value::String(message.to_string()));
                body.insert("total".to_string(), Value::from(items.len()));
                body.insert(data_key.clone(), values);
                Json(Value::Object(body))
            }
        }
    }

    /// 只有一条消息的响应体
    pub fn message(&self, message: &str) -> Json<Value> {
        let mut body = Map::new();
        body.insert(
            self.message_key().to_string(),
            Value::String(message.to_string()),
        );
        Json(Value::Object(body))
    }

    pub fn error(&self, status: StatusCode, message: &str) -> ApiError {
        (status, self.message(message))
    }

    pub fn not_found(&self, entity: &str, id: u64) -> ApiError {
        self.error(StatusCode::NOT_FOUND, &format!("{entity} {id} not found"))
    }
}

impl FromStr for ResponseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "bare" => Ok(Self::Bare),
            "data" => Ok(Self::data()),
            "datos" => Ok(Self::datos()),
            other => Err(format!("未知的响应格式: {other}")),
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare => f.write_str("none"),
            Self::Enveloped { data_key, .. } => f.write_str(data_key),
        }
    }
}

fn to_value<T: Serialize>(item: &T) -> Value {
    serde_json::to_value(item).unwrap_or(Value::Null)
}

/// 把 validator 的错误展开为 `字段路径 -> 消息列表`，嵌套列表用 `products.0.quantity` 形式
pub fn flatten_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    collect_errors("", errors, &mut fields);
    fields
}

fn collect_errors(
    prefix: &str,
    errors: &ValidationErrors,
    fields: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                fields
                    .entry(path)
                    .or_default()
                    .extend(list.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(&path, inner, fields),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(&format!("{path}.{index}"), inner, fields);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

/// 校验请求体，失败时转换为 422 响应
pub fn validate<T: Validate>(style: &ResponseStyle, input: &T) -> Result<(), ApiError> {
    input.validate().map_err(|errors| {
        let Json(mut body) = style.message("validation failed");
        if let Value::Object(map) = &mut body {
            map.insert("errors".to_string(), to_value(&flatten_errors(&errors)));
        }
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body))
    })
}
