//! 内存存储
//!
//! 使用 DashMap 实现的并发内存存储，按数字 ID 存放实体，并负责分配新 ID。

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 实体 ID
pub type Id = u64;

/// 通用内存存储
///
/// clone 后共享同一份数据。
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<Id, T>>,
    next_id: Arc<AtomicU64>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// 插入新实体
    ///
    /// `requested` 未被占用时直接使用，否则分配一个新的空闲 ID。
    /// `build` 接收最终 ID 并构造实体，返回存入的实体。
    pub fn insert_new<F>(&self, requested: Option<Id>, build: F) -> T
    where
        F: FnOnce(Id) -> T,
    {
        if let Some(id) = requested {
            if let Entry::Vacant(slot) = self.data.entry(id) {
                let item = build(id);
                slot.insert(item.clone());
                return item;
            }
        }

        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if let Entry::Vacant(slot) = self.data.entry(id) {
                let item = build(id);
                slot.insert(item.clone());
                return item;
            }
        }
    }

    /// 获取实体的克隆，不持有锁
    pub fn get(&self, id: Id) -> Option<T> {
        self.data.get(&id).map(|v| v.clone())
    }

    /// 原地修改实体，返回修改后的克隆；实体不存在时返回 None
    pub fn update<F>(&self, id: Id, apply: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        self.data.get_mut(&id).map(|mut entry| {
            apply(entry.value_mut());
            entry.value().clone()
        })
    }

    pub fn remove(&self, id: Id) -> Option<T> {
        self.data.remove(&id).map(|(_, v)| v)
    }

    /// 按 ID 升序列出所有实体
    pub fn list(&self) -> Vec<T> {
        let mut rows: Vec<(Id, T)> = self
            .data
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, item)| item).collect()
    }

    /// 按条件筛选，按 ID 升序
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.list().into_iter().filter(|item| predicate(item)).collect()
    }

    /// 所有已存在的 ID，升序
    pub fn ids(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.data.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.data.contains_key(&id)
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            next_id: Arc::clone(&self.next_id),
        }
    }
}
