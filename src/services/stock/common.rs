//! 公共常量和辅助函数

use chrono::Utc;
use chrono_tz::Asia::Shanghai;

// ==================== 东方财富 API 常量 ====================

/// 东方财富历史K线 API
pub const EM_KLINE_API: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
/// 东方财富沪深京A股实时行情列表 API
pub const EM_SPOT_API: &str = "https://82.push2.eastmoney.com/api/qt/clist/get";
/// K线接口 ut 参数
pub const EM_KLINE_UT: &str = "7eea3edcaed734bea9cbfc24409ed989";
/// 行情列表接口 ut 参数
pub const EM_SPOT_UT: &str = "bd1d9ddb04089700cf9c27f6f7426281";
/// 沪深京A股板块过滤条件
pub const EM_A_SHARE_FS: &str = "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const REFERER: &str = "https://quote.eastmoney.com/";

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
pub fn get_beijing_time() -> String {
    Utc::now().with_timezone(&Shanghai).to_rfc3339()
}

/// 是否为 6 位数字股票代码
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// 东方财富 secid：沪市（6 开头）为 1，其余为 0
pub fn to_secid(code: &str) -> String {
    let market = if code.starts_with('6') { 1 } else { 0 };
    format!("{}.{}", market, code)
}
