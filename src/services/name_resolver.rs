//! 股票名称解析
//!
//! 全市场代码-名称表按 TTL 缓存，过期后在下一次使用时整体替换

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::services::stock::NameSource;

/// 查不到名称时的占位
pub const UNKNOWN_NAME: &str = "unknown";

/// 代码 -> 名称
pub type NameMap = HashMap<String, String>;

/// 名称表快照，一次分析内只读
#[derive(Debug, Clone, Default)]
pub struct NameSnapshot {
    names: Arc<NameMap>,
}

impl NameSnapshot {
    pub fn new(names: NameMap) -> Self {
        Self {
            names: Arc::new(names),
        }
    }

    pub fn resolve(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 带时间戳的名称表缓存
#[derive(Debug)]
pub struct NameCache {
    snapshot: NameSnapshot,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl NameCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: NameSnapshot::default(),
            fetched_at: None,
            ttl,
        }
    }

    /// 已填充且未过期
    pub fn is_fresh(&self, now: Instant) -> bool {
        match self.fetched_at {
            Some(at) => now.saturating_duration_since(at) < self.ttl,
            None => false,
        }
    }

    /// 整体替换名称表
    pub fn replace(&mut self, names: NameMap, now: Instant) {
        self.snapshot = NameSnapshot::new(names);
        self.fetched_at = Some(now);
    }

    pub fn snapshot(&self) -> NameSnapshot {
        self.snapshot.clone()
    }
}

/// 名称解析器
///
/// 持有数据源与缓存；刷新时加锁，保证同一时刻只有一次拉取
pub struct NameResolver {
    source: Arc<dyn NameSource>,
    cache: Mutex<NameCache>,
}

impl NameResolver {
    pub fn new(source: Arc<dyn NameSource>, cache: NameCache) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
        }
    }

    /// 获取当前名称表，过期则先刷新
    ///
    /// 拉取失败时返回空表（名称全部为 unknown），且不记为已刷新，下一次会重试
    pub async fn snapshot(&self) -> NameSnapshot {
        let mut cache = self.cache.lock().await;
        if cache.is_fresh(Instant::now()) {
            return cache.snapshot();
        }

        match self.source.fetch_name_map().await {
            Ok(names) => {
                cache.replace(names, Instant::now());
                cache.snapshot()
            }
            Err(e) => {
                log::warn!("❌ 获取全市场名称表失败，名称将显示为 {}: {:#}", UNKNOWN_NAME, e);
                NameSnapshot::default()
            }
        }
    }

    #[cfg(test)]
    pub async fn resolve(&self, code: &str) -> String {
        self.snapshot().await.resolve(code)
    }
}
