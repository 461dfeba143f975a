//! 东方财富股票接口实现
//!
//! 提供前复权日K线与沪深京A股代码-名称映射
//! 对接 https://push2his.eastmoney.com 和 https://82.push2.eastmoney.com

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

use super::common::{
    to_secid, EM_A_SHARE_FS, EM_KLINE_API, EM_KLINE_UT, EM_SPOT_API, EM_SPOT_UT, REFERER,
    USER_AGENT,
};
use super::{BarSource, NameSource};
use crate::config::{ApiConfig, DataConfig};
use crate::models::Bar;

/// 东方财富行情客户端
///
/// 所有请求共用一个 `reqwest::Client`
#[derive(Debug, Clone)]
pub struct EastMoneyClient {
    client: Client,
    spot_page_size: usize,
}

impl EastMoneyClient {
    pub fn new(api: &ApiConfig, data: &DataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .context("创建 HTTP 客户端失败")?;

        Ok(Self {
            client,
            spot_page_size: data.spot_page_size.max(1),
        })
    }

    /// 获取一页行情列表，只取代码(f12)和名称(f14)
    async fn fetch_spot_page(&self, page: usize) -> Result<serde_json::Value> {
        let page = page.to_string();
        let size = self.spot_page_size.to_string();

        let response = self
            .client
            .get(EM_SPOT_API)
            .query(&[
                ("pn", page.as_str()),
                ("pz", size.as_str()),
                ("po", "1"),
                ("np", "1"),
                ("ut", EM_SPOT_UT),
                ("fltt", "2"),
                ("invt", "2"),
                ("fid", "f12"),
                ("fs", EM_A_SHARE_FS),
                ("fields", "f12,f14"),
            ])
            .header("Referer", REFERER)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取股票列表失败: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl BarSource for EastMoneyClient {
    /// 对应 akshare 的 stock_zh_a_hist(period="daily", adjust="qfq")
    async fn fetch_daily_bars(&self, code: &str, limit: usize) -> Result<Vec<Bar>> {
        let secid = to_secid(code);
        log::debug!("📡 请求日K线数据 secid={}", secid);

        let response = self
            .client
            .get(EM_KLINE_API)
            .query(&[
                ("fields1", "f1,f2,f3,f4,f5,f6"),
                ("fields2", "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61"),
                ("ut", EM_KLINE_UT),
                ("klt", "101"),
                ("fqt", "1"),
                ("secid", secid.as_str()),
                ("beg", "0"),
                ("end", "20500000"),
            ])
            .header("Referer", REFERER)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取历史数据失败: {}", response.status()));
        }

        let json: serde_json::Value = response.json().await?;
        let bars = parse_kline_response(&json, limit)
            .with_context(|| format!("解析 {} 日K线失败", code))?;
        log::debug!("📥 {} 获取到 {} 根K线", code, bars.len());
        Ok(bars)
    }
}

#[async_trait]
impl NameSource for EastMoneyClient {
    /// 对应 akshare 的 stock_zh_a_spot_em，逐页拉取直到取满 total
    async fn fetch_name_map(&self) -> Result<HashMap<String, String>> {
        log::info!("📡 请求全市场代码名称表");
        let mut names = HashMap::new();
        let mut page = 1;

        loop {
            let json = self.fetch_spot_page(page).await?;
            let (total, entries) = parse_spot_page(&json)?;
            if entries.is_empty() {
                break;
            }
            names.extend(entries);
            if names.len() >= total || page * self.spot_page_size >= total {
                break;
            }
            page += 1;
        }

        log::info!("✅ 名称表获取成功，共 {} 只股票", names.len());
        Ok(names)
    }
}

/// 解析K线接口响应，保留最后 `limit` 根
///
/// 格式: {"data":{"klines":["2024-01-02,9.39,9.21,9.42,9.21,1158366,...", ...]}}
/// 字段顺序: 日期,开盘,收盘,最高,最低,成交量,...
pub fn parse_kline_response(json: &serde_json::Value, limit: usize) -> Result<Vec<Bar>> {
    // 代码无效时 data 为 null
    let klines = match json["data"]["klines"].as_array() {
        Some(arr) => arr,
        None => return Ok(Vec::new()),
    };

    let start_idx = klines.len().saturating_sub(limit);
    klines
        .iter()
        .skip(start_idx)
        .map(|item| {
            let line = item.as_str().ok_or_else(|| anyhow!("K线格式错误: {}", item))?;
            parse_kline_line(line)
        })
        .collect()
}

fn parse_kline_line(line: &str) -> Result<Bar> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 6 {
        return Err(anyhow!("K线字段不足: {}", line));
    }

    let price = |idx: usize| -> Result<f64> {
        fields[idx]
            .trim()
            .parse::<f64>()
            .with_context(|| format!("价格字段无效: {}", line))
    };

    let date = NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d")
        .with_context(|| format!("日期字段无效: {}", line))?;
    let volume = fields[5]
        .trim()
        .parse::<f64>()
        .with_context(|| format!("成交量字段无效: {}", line))?;

    Ok(Bar {
        date,
        open: price(1)?,
        close: price(2)?,
        high: price(3)?,
        low: price(4)?,
        volume: volume.max(0.0).round() as u64,
    })
}

/// 解析一页行情列表，返回 (total, [(代码, 名称)])
///
/// np=1 时 diff 为数组，否则为以序号为键的对象，两种都兼容
pub fn parse_spot_page(json: &serde_json::Value) -> Result<(usize, Vec<(String, String)>)> {
    let data = &json["data"];
    if data.is_null() {
        return Ok((0, Vec::new()));
    }

    let total = data["total"].as_u64().unwrap_or(0) as usize;
    let items: Vec<&serde_json::Value> = match &data["diff"] {
        serde_json::Value::Array(arr) => arr.iter().collect(),
        serde_json::Value::Object(map) => map.values().collect(),
        serde_json::Value::Null => Vec::new(),
        other => return Err(anyhow!("行情列表格式错误: {}", other)),
    };

    let entries: Vec<(String, String)> = items
        .into_iter()
        .filter_map(|item| {
            let code = item["f12"].as_str()?;
            let name = item["f14"].as_str()?;
            Some((code.to_string(), name.trim().to_string()))
        })
        .collect();

    Ok((total, entries))
}
