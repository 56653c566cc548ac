//! 会话状态
//!
//! 记录单个模拟用户在本次会话中发现的实体 ID。
//! 每类 ID 都是有上限的有序列表，只在会话内存中存在。

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;

/// 实体 ID
pub type EntityId = u64;

/// 商品 ID 上限
pub const PRODUCT_CAP: usize = 5;
/// 购物车 ID 上限
pub const CART_CAP: usize = 3;
/// 用户 ID 上限
pub const USER_CAP: usize = 3;

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Product,
    Cart,
    User,
}

impl Entity {
    /// 该类实体在会话中最多保留的 ID 数
    pub fn cap(self) -> usize {
        match self {
            Self::Product => PRODUCT_CAP,
            Self::Cart => CART_CAP,
            Self::User => USER_CAP,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Cart => "cart",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 有上限的 ID 列表
///
/// 保持插入顺序；追加时若已满则淘汰最早的 ID，保证新 ID 一定在列表中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedIds {
    cap: usize,
    ids: VecDeque<EntityId>,
}

impl BoundedIds {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            ids: VecDeque::with_capacity(cap),
        }
    }

    /// 用列表接口返回的 ID 整体替换，只保留前 cap 个
    pub fn replace_with<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = EntityId>,
    {
        self.ids.clear();
        self.ids.extend(ids.into_iter().take(self.cap));
    }

    /// 追加新发现的 ID
    ///
    /// 已存在的 ID 不重复追加
    pub fn push(&mut self, id: EntityId) {
        if self.cap == 0 || self.ids.contains(&id) {
            return;
        }
        if self.ids.len() == self.cap {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
    }

    /// 移除 ID，返回列表中是否存在过该 ID
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&known| known != id);
        self.ids.len() != before
    }

    /// 随机选取一个已知 ID，列表为空时返回 None
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EntityId> {
        if self.ids.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.ids.len());
        self.ids.get(index).copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn to_vec(&self) -> Vec<EntityId> {
        self.ids.iter().copied().collect()
    }
}

/// 会话状态
///
/// 生命周期等于一次模拟会话，由会话独占，不跨会话共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub product_ids: BoundedIds,
    pub cart_ids: BoundedIds,
    pub user_ids: BoundedIds,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            product_ids: BoundedIds::new(PRODUCT_CAP),
            cart_ids: BoundedIds::new(CART_CAP),
            user_ids: BoundedIds::new(USER_CAP),
        }
    }

    pub fn ids(&self, entity: Entity) -> &BoundedIds {
        match entity {
            Entity::Product => &self.product_ids,
            Entity::Cart => &self.cart_ids,
            Entity::User => &self.user_ids,
        }
    }

    pub fn ids_mut(&mut self, entity: Entity) -> &mut BoundedIds {
        match entity {
            Entity::Product => &mut self.product_ids,
            Entity::Cart => &mut self.cart_ids,
            Entity::User => &mut self.user_ids,
        }
    }
}
