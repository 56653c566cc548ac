//! 任务定义
//!
//! 每个任务对应目标 API 上的一个操作，带相对权重。
//! 会话每个节拍按权重随机挑选一个任务执行。

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use reqwest::Method;
use storefront_shared::{LoadError, Result};

use crate::profile::Routes;
use crate::session::state::{Entity, EntityId};

/// 目标 API 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    ListProducts,
    GetProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    ListCarts,
    GetCart,
    CreateCart,
    AddProductToCart,
    UpdateCart,
    ListUsers,
    GetUser,
    CreateUser,
    Login,
}

impl Operation {
    /// 所有操作，顺序即任务表的展示顺序
    pub const ALL: [Operation; 14] = [
        Self::ListProducts,
        Self::GetProduct,
        Self::CreateProduct,
        Self::UpdateProduct,
        Self::DeleteProduct,
        Self::ListCarts,
        Self::GetCart,
        Self::CreateCart,
        Self::AddProductToCart,
        Self::UpdateCart,
        Self::ListUsers,
        Self::GetUser,
        Self::CreateUser,
        Self::Login,
    ];

    /// 可读名称，用于失败标签和汇总输出
    pub fn name(self) -> &'static str {
        match self {
            Self::ListProducts => "list products",
            Self::GetProduct => "get product",
            Self::CreateProduct => "create product",
            Self::UpdateProduct => "update product",
            Self::DeleteProduct => "delete product",
            Self::ListCarts => "list carts",
            Self::GetCart => "get cart",
            Self::CreateCart => "create cart",
            Self::AddProductToCart => "add product to cart",
            Self::UpdateCart => "update cart",
            Self::ListUsers => "list users",
            Self::GetUser => "get user",
            Self::CreateUser => "create user",
            Self::Login => "login",
        }
    }

    /// 配置中使用的任务标识
    pub fn key(self) -> &'static str {
        match self {
            Self::ListProducts => "list_products",
            Self::GetProduct => "get_product",
            Self::CreateProduct => "create_product",
            Self::UpdateProduct => "update_product",
            Self::DeleteProduct => "delete_product",
            Self::ListCarts => "list_carts",
            Self::GetCart => "get_cart",
            Self::CreateCart => "create_cart",
            Self::AddProductToCart => "add_product_to_cart",
            Self::UpdateCart => "update_cart",
            Self::ListUsers => "list_users",
            Self::GetUser => "get_user",
            Self::CreateUser => "create_user",
            Self::Login => "login",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.key() == key)
    }

    pub fn method(self) -> Method {
        match self {
            Self::ListProducts
            | Self::GetProduct
            | Self::ListCarts
            | Self::GetCart
            | Self::ListUsers
            | Self::GetUser => Method::GET,
            Self::CreateProduct
            | Self::CreateCart
            | Self::AddProductToCart
            | Self::CreateUser
            | Self::Login => Method::POST,
            Self::UpdateProduct | Self::UpdateCart => Method::PUT,
            Self::DeleteProduct => Method::DELETE,
        }
    }

    /// 视为成功的状态码
    pub fn success_codes(self) -> &'static [u16] {
        match self {
            Self::CreateProduct | Self::CreateCart | Self::CreateUser => &[200, 201],
            Self::DeleteProduct => &[200, 204],
            _ => &[200],
        }
    }

    pub fn is_success(self, status: u16) -> bool {
        self.success_codes().contains(&status)
    }

    /// 执行前必须已知的实体 ID 类型
    pub fn required_entity(self) -> Option<Entity> {
        match self {
            Self::GetProduct | Self::UpdateProduct | Self::DeleteProduct => Some(Entity::Product),
            Self::GetCart | Self::AddProductToCart | Self::UpdateCart => Some(Entity::Cart),
            Self::GetUser => Some(Entity::User),
            _ => None,
        }
    }

    /// 列表操作刷新的 ID 类型
    pub fn listed_entity(self) -> Option<Entity> {
        match self {
            Self::ListProducts => Some(Entity::Product),
            Self::ListCarts => Some(Entity::Cart),
            Self::ListUsers => Some(Entity::User),
            _ => None,
        }
    }

    /// 创建操作新增的 ID 类型
    pub fn created_entity(self) -> Option<Entity> {
        match self {
            Self::CreateProduct => Some(Entity::Product),
            Self::CreateCart => Some(Entity::Cart),
            Self::CreateUser => Some(Entity::User),
            _ => None,
        }
    }

    /// 生成请求路径
    pub fn path(self, routes: &Routes, id: Option<EntityId>) -> String {
        let id = id.map(|id| id.to_string()).unwrap_or_default();
        match self {
            Self::ListProducts | Self::CreateProduct => routes.products.clone(),
            Self::GetProduct | Self::UpdateProduct | Self::DeleteProduct => {
                format!("{}/{}", routes.products, id)
            }
            Self::ListCarts | Self::CreateCart => routes.carts.clone(),
            Self::GetCart | Self::UpdateCart => format!("{}/{}", routes.carts, id),
            Self::AddProductToCart => format!("{}/{}/product", routes.carts, id),
            Self::ListUsers | Self::CreateUser => routes.users.clone(),
            Self::GetUser => format!("{}/{}", routes.users, id),
            Self::Login => routes.login.clone(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 任务描述：操作 + 相对权重
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub operation: Operation,
    pub weight: u32,
}

impl TaskDescriptor {
    pub const fn new(operation: Operation, weight: u32) -> Self {
        Self { operation, weight }
    }
}

/// 带权任务集
///
/// 构建时校验权重：至少要有一个正权重任务，权重之和不能超过 `u32::MAX`。
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<TaskDescriptor>,
    index: WeightedIndex<u32>,
}

impl TaskSet {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Result<Self> {
        if tasks.is_empty() {
            return Err(LoadError::InvalidWeights("任务集为空".to_string()));
        }
        if tasks
            .iter()
            .try_fold(0u32, |acc, task| acc.checked_add(task.weight))
            .is_none()
        {
            return Err(LoadError::InvalidWeights("权重之和溢出".to_string()));
        }
        let index = WeightedIndex::new(tasks.iter().map(|task| task.weight))
            .map_err(|e| LoadError::InvalidWeights(e.to_string()))?;
        Ok(Self { tasks, index })
    }

    /// 应用权重覆盖，key 为任务标识
    ///
    /// 覆盖表中出现任务集里没有的操作时，以该权重追加任务。
    pub fn with_overrides(&self, overrides: &HashMap<String, u32>) -> Result<Self> {
        let mut tasks = self.tasks.clone();
        let mut keys: Vec<&String> = overrides.keys().collect();
        keys.sort();

        for key in keys {
            let operation = Operation::from_key(key)
                .ok_or_else(|| LoadError::UnknownOperation(key.clone()))?;
            let weight = overrides[key];
            match tasks.iter_mut().find(|task| task.operation == operation) {
                Some(task) => task.weight = weight,
                None => tasks.push(TaskDescriptor::new(operation, weight)),
            }
        }

        Self::new(tasks)
    }

    /// 按权重随机挑选一个操作
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Operation {
        self.tasks[self.index.sample(rng)].operation
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn weight_of(&self, operation: Operation) -> u32 {
        self.tasks
            .iter()
            .find(|task| task.operation == operation)
            .map(|task| task.weight)
            .unwrap_or(0)
    }

    pub fn total_weight(&self) -> u64 {
        self.tasks.iter().map(|task| u64::from(task.weight)).sum()
    }
}
