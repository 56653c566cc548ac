//! 购物车模型

use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Id,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Id,
    pub user_id: Id,
    pub date: String,
    pub products: Vec<CartLine>,
}

/// 购物车条目请求体，productId 和 quantity 必填
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CartLineInput {
    #[serde(rename = "productId")]
    #[validate(required(message = "The productId field is required."))]
    pub product_id: Option<Id>,
    #[validate(required(message = "The quantity field is required."))]
    pub quantity: Option<u32>,
}

/// 创建购物车请求体
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewCartInput {
    #[validate(required(message = "The id field is required."))]
    pub id: Option<Id>,
    #[serde(rename = "userId")]
    #[validate(required(message = "The userId field is required."))]
    pub user_id: Option<Id>,
    pub date: Option<String>,
    #[validate(required(message = "The products field is required."), nested)]
    pub products: Option<Vec<CartLineInput>>,
}

/// 更新购物车请求体，字段都可省略
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CartInput {
    #[serde(rename = "userId")]
    pub user_id: Option<Id>,
    pub date: Option<String>,
    #[validate(nested)]
    pub products: Option<Vec<CartLineInput>>,
}

/// 向购物车追加商品的请求体
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CartProductsInput {
    #[validate(required(message = "The products field is required."), nested)]
    pub products: Option<Vec<CartLineInput>>,
}

impl CartLineInput {
    /// 字段不全时返回 None
    pub fn to_line(&self) -> Option<CartLine> {
        Some(CartLine {
            product_id: self.product_id?,
            quantity: self.quantity?,
        })
    }
}

/// 把已校验的条目转换为购物车条目
pub fn to_lines(inputs: &[CartLineInput]) -> Vec<CartLine> {
    inputs.iter().filter_map(CartLineInput::to_line).collect()
}

impl Cart {
    /// 生成随机购物车，商品和用户从已有 ID 中挑选
    pub fn random(id: Id, product_ids: &[Id], user_ids: &[Id]) -> Self {
        let mut rng = rand::thread_rng();
        let days_ago = rng.gen_range(0..90);
        let line_count = rng.gen_range(1..=3);

        let products = (0..line_count)
            .map(|_| CartLine {
                product_id: product_ids
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or_else(|| rng.gen_range(1..=20)),
                quantity: rng.gen_range(1..=5),
            })
            .collect();

        Self {
            id,
            user_id: user_ids
                .choose(&mut rng)
                .copied()
                .unwrap_or_else(|| rng.gen_range(1..=10)),
            date: (Utc::now() - Duration::days(days_ago))
                .format("%Y-%m-%d")
                .to_string(),
            products,
        }
    }
}
