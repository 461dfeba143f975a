//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，缺省字段使用默认值

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::services::signal_engine::SignalParams;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 上游接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 行情数据配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// 每只股票拉取的日K线条数
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// 全市场名称表缓存时长（秒）
    #[serde(default = "default_name_cache_ttl")]
    pub name_cache_ttl_secs: u64,
    /// 全市场名称表分页大小
    #[serde(default = "default_spot_page_size")]
    pub spot_page_size: usize,
}

/// 初始自选股
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchListConfig {
    #[serde(default)]
    pub codes: Vec<String>,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游接口配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 行情数据配置
    #[serde(default)]
    pub data: DataConfig,
    /// 信号阈值
    #[serde(default)]
    pub signal: SignalParams,
    /// 初始自选股
    #[serde(default)]
    pub watchlist: WatchListConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_history_limit() -> usize { 30 }
fn default_name_cache_ttl() -> u64 { 3600 }
fn default_spot_page_size() -> usize { 100 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            name_cache_ttl_secs: default_name_cache_ttl(),
            spot_page_size: default_spot_page_size(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 日志系统此时可能尚未初始化，所以结果通过返回的提示信息交给调用方打印
    pub fn load() -> (Self, String) {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return (config, format!("从 {} 加载配置成功", path)),
                    Err(e) => {
                        return (Self::default(), format!("加载配置文件 {} 失败: {}，使用默认配置", path, e));
                    }
                }
            }
        }

        (Self::default(), "使用默认配置".to_string())
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
