//! 业务逻辑服务模块
//!
//! 封装数据获取、信号计算和名单管理

pub mod monitor_service; // 整批监控
pub mod name_resolver;   // 名称解析与缓存
pub mod signal_engine;   // 10日线信号引擎
pub mod stock;           // 行情数据源
pub mod watchlist;       // 自选股名单
