//! 会话模板
//!
//! 同一套会话设计的两种独立配置：直连商城 API（storefront）与网关（gateway）。
//! 两者在信封字段名、商品路径和思考时间上不同，任务与默认权重一致。

use std::time::Duration;

use rand::Rng;
use storefront_shared::config::SessionConfig;
use storefront_shared::{LoadError, Result};

use crate::tasks::{Operation, TaskDescriptor, TaskSet};

/// 资源路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub products: String,
    pub carts: String,
    pub users: String,
    pub login: String,
}

/// 思考时间范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min: Duration,
    max: Duration,
}

impl ThinkTime {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(LoadError::InvalidThinkTime {
                min_ms: min.as_millis() as u64,
                max_ms: max.as_millis() as u64,
            });
        }
        Ok(Self { min, max })
    }

    pub fn from_secs(min: u64, max: u64) -> Result<Self> {
        Self::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    /// 在范围内均匀随机取一个暂停时长
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rng.gen_range(self.min.as_millis() as u64..=self.max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

/// 默认任务权重，两种模板共用
const DEFAULT_TASKS: [TaskDescriptor; 14] = [
    TaskDescriptor::new(Operation::ListProducts, 3),
    TaskDescriptor::new(Operation::GetProduct, 2),
    TaskDescriptor::new(Operation::CreateProduct, 1),
    TaskDescriptor::new(Operation::UpdateProduct, 1),
    TaskDescriptor::new(Operation::DeleteProduct, 1),
    TaskDescriptor::new(Operation::ListCarts, 2),
    TaskDescriptor::new(Operation::GetCart, 2),
    TaskDescriptor::new(Operation::CreateCart, 1),
    TaskDescriptor::new(Operation::AddProductToCart, 1),
    TaskDescriptor::new(Operation::UpdateCart, 1),
    TaskDescriptor::new(Operation::ListUsers, 1),
    TaskDescriptor::new(Operation::GetUser, 1),
    TaskDescriptor::new(Operation::CreateUser, 1),
    TaskDescriptor::new(Operation::Login, 1),
];

/// 会话模板
#[derive(Debug, Clone)]
pub struct SessionProfile {
    pub name: String,
    /// 信封字段名
    pub envelope_key: String,
    pub routes: Routes,
    pub think_time: ThinkTime,
    pub tasks: TaskSet,
}

impl SessionProfile {
    /// 直连商城 API：`data` 信封，`/product` 路径，思考时间 1-5 秒
    pub fn storefront() -> Self {
        Self {
            name: "storefront".to_string(),
            envelope_key: "data".to_string(),
            routes: Routes {
                products: "/product".to_string(),
                carts: "/carts".to_string(),
                users: "/users".to_string(),
                login: "/auth/login".to_string(),
            },
            think_time: ThinkTime {
                min: Duration::from_secs(1),
                max: Duration::from_secs(5),
            },
            tasks: default_tasks(),
        }
    }

    /// 网关：`datos` 信封，`/products` 路径，思考时间 1-3 秒
    pub fn gateway() -> Self {
        Self {
            name: "gateway".to_string(),
            envelope_key: "datos".to_string(),
            routes: Routes {
                products: "/products".to_string(),
                carts: "/carts".to_string(),
                users: "/users".to_string(),
                login: "/auth/login".to_string(),
            },
            think_time: ThinkTime {
                min: Duration::from_secs(1),
                max: Duration::from_secs(3),
            },
            tasks: default_tasks(),
        }
    }

    /// 可用模板名称
    pub fn names() -> [&'static str; 2] {
        ["storefront", "gateway"]
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "storefront" => Ok(Self::storefront()),
            "gateway" => Ok(Self::gateway()),
            other => Err(LoadError::UnknownProfile(other.to_string())),
        }
    }

    /// 按会话配置构建模板：选择模板并应用思考时间与权重覆盖
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let mut profile = Self::by_name(&config.profile)?;

        if config.think_time_min_ms.is_some() || config.think_time_max_ms.is_some() {
            let min = config
                .think_time_min_ms
                .map(Duration::from_millis)
                .unwrap_or(profile.think_time.min);
            let max = config
                .think_time_max_ms
                .map(Duration::from_millis)
                .unwrap_or(profile.think_time.max);
            profile.think_time = ThinkTime::new(min, max)?;
        }

        if !config.weights.is_empty() {
            profile.tasks = profile.tasks.with_overrides(&config.weights)?;
        }

        Ok(profile)
    }

    pub fn with_think_time(mut self, think_time: ThinkTime) -> Self {
        self.think_time = think_time;
        self
    }

    pub fn with_tasks(mut self, tasks: TaskSet) -> Self {
        self.tasks = tasks;
        self
    }
}

fn default_tasks() -> TaskSet {
    match TaskSet::new(DEFAULT_TASKS.to_vec()) {
        Ok(set) => set,
        // 默认权重全部为正，构建不会失败
        Err(e) => unreachable!("默认任务集无效: {e}"),
    }
}
