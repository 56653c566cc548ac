//! 请求体模板
//!
//! 每类实体一份固定的示例请求体，创建时附加随机后缀/字段，
//! 避免重复创建时产生意外的幂等冲突。模板在每个会话中重新构建，会话之间互不影响。

use chrono::Utc;
use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::session::state::{BoundedIds, EntityId};

pub const PRODUCT_TITLE: &str = "Test Product";
pub const PRODUCT_UPDATE_TITLE: &str = "Updated Test Product";
pub const PRODUCT_DESCRIPTION: &str = "Lorem ipsum set";
pub const PRODUCT_IMAGE: &str = "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg";
pub const PRODUCT_CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];
pub const LOGIN_USERNAME: &str = "mor_2314";
pub const LOGIN_PASSWORD: &str = "83r5^_";

/// 创建商品请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub category: String,
}

/// 商品局部更新请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdatePayload {
    pub title: String,
    pub price: f64,
}

/// 购物车条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: EntityId,
    pub quantity: u32,
}

/// 创建购物车请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub id: EntityId,
    pub user_id: EntityId,
    pub date: String,
    pub products: Vec<CartLine>,
}

/// 更新购物车请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdatePayload {
    pub user_id: EntityId,
    pub date: String,
    pub products: Vec<CartLine>,
}

/// 向购物车追加商品请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProductsPayload {
    pub products: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserName {
    pub firstname: String,
    pub lastname: String,
}

/// 创建用户请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: UserName,
    pub phone: String,
}

/// 登录请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// 会话级请求体模板
///
/// 字段值来自上面的常量，会话创建时构建一份，之后只读。
#[derive(Debug, Clone)]
pub struct PayloadTemplates {
    product_title: String,
    product_update_title: String,
    product_description: String,
    product_image: String,
    categories: Vec<String>,
    credentials: LoginPayload,
}

impl Default for PayloadTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadTemplates {
    pub fn new() -> Self {
        Self {
            product_title: PRODUCT_TITLE.to_string(),
            product_update_title: PRODUCT_UPDATE_TITLE.to_string(),
            product_description: PRODUCT_DESCRIPTION.to_string(),
            product_image: PRODUCT_IMAGE.to_string(),
            categories: PRODUCT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            credentials: LoginPayload {
                username: LOGIN_USERNAME.to_string(),
                password: LOGIN_PASSWORD.to_string(),
            },
        }
    }

    /// 新商品：标题带随机后缀，价格 1.00-200.00
    pub fn product<R: Rng + ?Sized>(&self, rng: &mut R) -> ProductPayload {
        let category = &self.categories[rng.gen_range(0..self.categories.len())];
        let description = if rng.gen_bool(0.5) {
            self.product_description.clone()
        } else {
            Sentence(3..8).fake()
        };

        ProductPayload {
            title: format!("{} {}", self.product_title, short_suffix()),
            price: random_price(rng),
            description,
            image: self.product_image.clone(),
            category: category.clone(),
        }
    }

    /// 商品局部更新：只改标题和价格
    pub fn product_update<R: Rng + ?Sized>(&self, rng: &mut R) -> ProductUpdatePayload {
        ProductUpdatePayload {
            title: self.product_update_title.clone(),
            price: random_price(rng),
        }
    }

    /// 新购物车：ID 取 1000-9999，商品数量 1-5
    pub fn cart<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        products: &BoundedIds,
        users: &BoundedIds,
    ) -> CartPayload {
        CartPayload {
            id: rng.gen_range(1000..=9999),
            user_id: pick_user(rng, users),
            date: today(),
            products: vec![random_line(rng, products, 1..=5)],
        }
    }

    /// 追加到购物车的商品，数量 1-5
    pub fn cart_products<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        products: &BoundedIds,
    ) -> CartProductsPayload {
        CartProductsPayload {
            products: vec![random_line(rng, products, 1..=5)],
        }
    }

    /// 购物车更新，数量 1-3
    pub fn cart_update<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        products: &BoundedIds,
        users: &BoundedIds,
    ) -> CartUpdatePayload {
        CartUpdatePayload {
            user_id: pick_user(rng, users),
            date: today(),
            products: vec![random_line(rng, products, 1..=3)],
        }
    }

    /// 新用户：ID 取 1000-9999，用户名和邮箱带随机后缀
    pub fn user<R: Rng + ?Sized>(&self, rng: &mut R) -> UserPayload {
        let suffix = short_suffix();
        let username: String = Username().fake();
        let email: String = SafeEmail().fake();
        let (local, domain) = email.split_once('@').unwrap_or(("user", "example.com"));

        UserPayload {
            id: rng.gen_range(1000..=9999),
            username: format!("{}_{}", username, suffix),
            email: format!("{}+{}@{}", local, suffix, domain),
            password: format!("pw-{}", Uuid::new_v4().simple()),
            name: UserName {
                firstname: FirstName().fake(),
                lastname: LastName().fake(),
            },
            phone: PhoneNumber().fake(),
        }
    }

    /// 固定的示例登录凭据
    pub fn login(&self) -> LoginPayload {
        self.credentials.clone()
    }
}

fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn random_price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let cents: u32 = rng.gen_range(100..=20000);
    f64::from(cents) / 100.0
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// 购物车里的商品优先取会话已知的商品，否则取 1-20
fn random_line<R: Rng + ?Sized>(
    rng: &mut R,
    products: &BoundedIds,
    quantity: std::ops::RangeInclusive<u32>,
) -> CartLine {
    let product_id = products
        .choose(rng)
        .unwrap_or_else(|| rng.gen_range(1..=20));
    CartLine {
        product_id,
        quantity: rng.gen_range(quantity),
    }
}

/// 购物车所属用户优先取会话已知的用户，否则取 1-10
fn pick_user<R: Rng + ?Sized>(rng: &mut R, users: &BoundedIds) -> EntityId {
    users.choose(rng).unwrap_or_else(|| rng.gen_range(1..=10))
}

impl From<CartLine> for Value {
    fn from(line: CartLine) -> Self {
        json!({"productId": line.product_id, "quantity": line.quantity})
    }
}

fn lines_to_value(lines: Vec<CartLine>) -> Value {
    Value::Array(lines.into_iter().map(Value::from).collect())
}

impl From<ProductPayload> for Value {
    fn from(payload: ProductPayload) -> Self {
        json!({
            "title": payload.title,
            "price": payload.price,
            "description": payload.description,
            "image": payload.image,
            "category": payload.category,
        })
    }
}

impl From<ProductUpdatePayload> for Value {
    fn from(payload: ProductUpdatePayload) -> Self {
        json!({"title": payload.title, "price": payload.price})
    }
}

impl From<CartPayload> for Value {
    fn from(payload: CartPayload) -> Self {
        json!({
            "id": payload.id,
            "userId": payload.user_id,
            "date": payload.date,
            "products": lines_to_value(payload.products),
        })
    }
}

impl From<CartUpdatePayload> for Value {
    fn from(payload: CartUpdatePayload) -> Self {
        json!({
            "userId": payload.user_id,
            "date": payload.date,
            "products": lines_to_value(payload.products),
        })
    }
}

impl From<CartProductsPayload> for Value {
    fn from(payload: CartProductsPayload) -> Self {
        json!({"products": lines_to_value(payload.products)})
    }
}

impl From<UserPayload> for Value {
    fn from(payload: UserPayload) -> Self {
        json!({
            "id": payload.id,
            "username": payload.username,
            "email": payload.email,
            "password": payload.password,
            "name": {
                "firstname": payload.name.firstname,
                "lastname": payload.name.lastname,
            },
            "phone": payload.phone,
        })
    }
}

impl From<LoginPayload> for Value {
    fn from(payload: LoginPayload) -> Self {
        json!({"username": payload.username, "password": payload.password})
    }
}
