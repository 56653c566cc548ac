//! 商品模型

use fake::Fake;
use fake::faker::lorem::en::{Sentence, Words};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::store::Id;

pub const CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

/// 创建/更新商品的请求体，所有字段可选
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl Product {
    /// 由请求体构造新商品，缺失字段取空值
    pub fn from_input(id: Id, input: ProductInput) -> Self {
        Self {
            id,
            title: input.title.unwrap_or_default(),
            price: input.price.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            image: input.image.unwrap_or_default(),
            rating: Rating {
                rate: 0.0,
                count: 0,
            },
        }
    }

    /// 只覆盖请求中出现的字段
    pub fn apply(&mut self, input: ProductInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(category) = input.category {
            self.category = category;
        }
        if let Some(image) = input.image {
            self.image = image;
        }
    }

    /// 生成随机商品
    pub fn random(id: Id) -> Self {
        let mut rng = rand::thread_rng();
        let words: Vec<String> = Words(2..4).fake();
        let cents: u32 = rng.gen_range(199..=49999);

        Self {
            id,
            title: capitalize(&words.join(" ")),
            price: f64::from(cents) / 100.0,
            description: Sentence(6..14).fake(),
            category: CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
            image: format!("https://fakestoreapi.com/img/{id}.jpg"),
            rating: Rating {
                rate: f64::from(rng.gen_range(10..=50u32)) / 10.0,
                count: rng.gen_range(0..500),
            },
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
