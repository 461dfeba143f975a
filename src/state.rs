//! 应用共享状态

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::monitor_service::MonitorService;
use crate::services::name_resolver::{NameCache, NameResolver};
use crate::services::stock::{BarSource, EastMoneyClient, NameSource};
use crate::services::watchlist::WatchList;

/// 所有 worker 共享的状态，放在 `web::Data` 中
pub struct AppState {
    pub monitor: MonitorService,
    watchlist: Mutex<WatchList>,
}

impl AppState {
    pub fn new(monitor: MonitorService, watchlist: WatchList) -> Self {
        Self {
            monitor,
            watchlist: Mutex::new(watchlist),
        }
    }

    /// 按配置组装：东方财富数据源 + 初始自选股
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = Arc::new(EastMoneyClient::new(&config.api, &config.data)?);
        let bars: Arc<dyn BarSource> = client.clone();
        let names: Arc<dyn NameSource> = client;

        let resolver = NameResolver::new(
            names,
            NameCache::new(Duration::from_secs(config.data.name_cache_ttl_secs)),
        );
        let monitor = MonitorService::new(
            bars,
            resolver,
            config.signal.clone(),
            config.data.history_limit,
        );

        let mut watchlist = WatchList::new();
        for code in &config.watchlist.codes {
            if let Err(e) = watchlist.add(code) {
                log::warn!("忽略配置中的自选股: {}", e);
            }
        }
        log::info!("初始自选股 {} 只", watchlist.len());

        Ok(Self::new(monitor, watchlist))
    }

    /// 获取名单锁，锁中毒时沿用内部数据
    pub fn watchlist(&self) -> MutexGuard<'_, WatchList> {
        self.watchlist
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
