//! 股票行情数据模型
//!
//! 定义日K线等行情相关的数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单日K线（前复权）
///
/// 序列按日期升序排列，最新一根在最后
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 交易日
    pub date: NaiveDate,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量（手）
    pub volume: u64,
}

#[cfg(test)]
impl Bar {
    /// 仅有收盘价和成交量的K线，开高低均取收盘价
    pub fn from_close(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}
