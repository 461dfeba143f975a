//! 股票行情数据源
//!
//! 分析流程只依赖这里的两个 trait，具体实现为东方财富接口

pub mod common;
pub mod eastmoney;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::models::Bar;

pub use eastmoney::EastMoneyClient;

/// 历史日K线数据源
#[async_trait]
pub trait BarSource: Send + Sync {
    /// 获取最近 `limit` 根前复权日K线，按日期升序
    async fn fetch_daily_bars(&self, code: &str, limit: usize) -> Result<Vec<Bar>>;
}

/// 全市场代码-名称数据源
#[async_trait]
pub trait NameSource: Send + Sync {
    async fn fetch_name_map(&self) -> Result<HashMap<String, String>>;
}
