//! 信号数据模型
//!
//! 10日线回踩分析的输出：单只股票的信号、跳过记录以及整批监控报告

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 进入"重点推荐"的最低分，只有绝佳买点能达到
pub const TOP_PICK_SCORE: i32 = 3;

/// 重点推荐的技术面说明
pub const TOP_PICK_NOTE: &str = "10日线呈上升趋势且今日成功缩量企稳。";

/// 购买建议分类
///
/// 分值越高越值得参与，直接作为排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    /// 均线向上，缩量回踩到支撑位
    PrimeEntry,
    /// 均线向上，在支撑位但量能未缩
    Caution,
    /// 均线向上，远离均线
    Overbought,
    /// 均线向上，尚未回踩
    Uptrend,
    /// 均线走平或向下，且跌破均线
    Breakdown,
    /// 均线走平或向下，价格仍在均线上
    Sideways,
}

impl Advice {
    pub fn score(self) -> i32 {
        match self {
            Advice::PrimeEntry => 3,
            Advice::Caution => 2,
            Advice::Uptrend => 1,
            Advice::Sideways => 0,
            Advice::Overbought => -1,
            Advice::Breakdown => -2,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Advice::PrimeEntry => "💎 绝佳买点：缩量回踩强支撑，风险收益比极高，可逢低布局。",
            Advice::Caution => "⚠️ 警惕：虽在支撑位但抛压尚存，建议分批建仓或等放量止跌。",
            Advice::Overbought => "🔥 极度超买：远离均线，谨防高位回落，切勿追涨。",
            Advice::Uptrend => "📈 趋势向上：暂未回踩，建议设定10日线预埋单等待。",
            Advice::Breakdown => "🚫 破位：跌破短线生命线，趋势转坏，建议离场或止损。",
            Advice::Sideways => "💤 震荡：趋势不明，暂无参与价值。",
        }
    }
}

/// 单只股票的分析信号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// 股票代码
    pub code: String,
    /// 股票名称，查不到时为 "unknown"
    pub name: String,
    /// 现价（最新收盘价）
    pub price: f64,
    /// 10日线，保留两位小数
    pub ma10: f64,
    /// 距均线，百分比字符串，如 "1.98%"
    pub distance: String,
    /// 距均线原始比例
    pub distance_ratio: f64,
    /// 建议分类
    pub category: Advice,
    /// 购买建议
    pub advice: String,
    /// 排序分
    pub score: i32,
}

impl Signal {
    pub fn is_top_pick(&self) -> bool {
        self.score >= TOP_PICK_SCORE
    }
}

/// 股票被跳过的原因
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("行情数据不可用: {0}")]
    DataUnavailable(String),
    #[error("历史数据不足: 仅 {bars} 根K线")]
    InsufficientHistory { bars: usize },
    #[error("行情序列异常: {0}")]
    MalformedSeries(String),
}

/// 被跳过的股票
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub code: String,
    pub reason: SkipReason,
}

/// 单只股票的分析结果：成功得到信号，或明确被跳过
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Signal(Signal),
    Skipped(SkippedTicker),
}

impl AnalysisOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            AnalysisOutcome::Signal(signal) => Some(signal),
            AnalysisOutcome::Skipped(_) => None,
        }
    }
}

/// 一次完整监控的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorReport {
    /// 按排序分降序排列的信号
    pub rows: Vec<Signal>,
    /// 排序分 >= 3 的重点推荐
    pub top_picks: Vec<Signal>,
    /// 重点推荐的技术面说明
    pub top_pick_note: Option<String>,
    /// 被跳过的股票
    pub skipped: Vec<SkippedTicker>,
    /// 本次监控的股票数
    pub total: usize,
    /// 给用户的提示
    pub message: Option<String>,
    /// 生成时间（北京时间）
    pub generated_at: String,
}

/// 按排序分降序排列，同分保持原有顺序
pub fn rank(mut signals: Vec<Signal>) -> Vec<Signal> {
    signals.sort_by(|a, b| b.score.cmp(&a.score));
    signals
}

/// 挑出重点推荐
pub fn top_picks(rows: &[Signal]) -> Vec<Signal> {
    rows.iter().filter(|s| s.is_top_pick()).cloned().collect()
}
