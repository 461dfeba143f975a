//! 10日线回踩信号引擎
//!
//! 输入一段按日期升序的日K线，计算 MA10、均线方向、距均线比例、
//! 当日量与前 5 日均量的对比，输出购买建议与排序分。
//! 引擎本身是纯计算，不做任何 IO，也不会 panic。

use serde::{Deserialize, Serialize};

use crate::models::{Advice, Bar, Signal, SkipReason};

/// 信号阈值
///
/// 默认值即既定的行为约定，可通过配置调整
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalParams {
    /// 均线周期
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,
    /// 支撑带上沿：0 <= dist <= support_band 视为踩线
    #[serde(default = "default_support_band")]
    pub support_band: f64,
    /// 超买阈值：dist > overbought 视为极度超买
    #[serde(default = "default_overbought")]
    pub overbought: f64,
    /// 均量窗口（不含当日）
    #[serde(default = "default_volume_window")]
    pub volume_window: usize,
}

fn default_ma_window() -> usize { 10 }
fn default_support_band() -> f64 { 0.025 }
fn default_overbought() -> f64 { 0.10 }
fn default_volume_window() -> usize { 5 }

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            ma_window: default_ma_window(),
            support_band: default_support_band(),
            overbought: default_overbought(),
            volume_window: default_volume_window(),
        }
    }
}

/// 分类所需的全部读数，取自最新两根K线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// curr.MA10 > prev.MA10
    pub ma_rising: bool,
    pub close: f64,
    pub ma: f64,
    /// (close - ma) / ma
    pub dist: f64,
    pub volume: f64,
    /// 前 N 日均量，不含当日
    pub volume_avg: f64,
}

/// 引擎的计算结果，尚未附带代码和名称
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub reading: Reading,
    pub advice: Advice,
}

/// 简单移动平均
///
/// 第 i 位为 `values[i+1-window..=i]` 的均值，前 `window-1` 位为 None
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// 按固定顺序分类，先命中者为准
pub fn classify(reading: &Reading, params: &SignalParams) -> Advice {
    if reading.ma_rising {
        if (0.0..=params.support_band).contains(&reading.dist) {
            if reading.volume < reading.volume_avg {
                Advice::PrimeEntry
            } else {
                Advice::Caution
            }
        } else if reading.dist > params.overbought {
            Advice::Overbought
        } else {
            Advice::Uptrend
        }
    } else if reading.close < reading.ma {
        Advice::Breakdown
    } else {
        Advice::Sideways
    }
}

/// 从K线序列中取出最新两根的读数
pub fn read_latest(bars: &[Bar], params: &SignalParams) -> Result<Reading, SkipReason> {
    if bars.is_empty() {
        return Err(SkipReason::DataUnavailable("K线为空".to_string()));
    }
    if bars.len() < 2 || params.ma_window == 0 {
        return Err(SkipReason::InsufficientHistory { bars: bars.len() });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ma = moving_average(&closes, params.ma_window);

    let last = bars.len() - 1;
    let (curr_ma, prev_ma) = match (ma[last], ma[last - 1]) {
        (Some(curr), Some(prev)) => (curr, prev),
        _ => return Err(SkipReason::InsufficientHistory { bars: bars.len() }),
    };

    if !curr_ma.is_finite() || !prev_ma.is_finite() || curr_ma <= 0.0 {
        return Err(SkipReason::MalformedSeries(format!("均线数值异常: {}", curr_ma)));
    }

    // 当日之前的 N 根K线
    if params.volume_window == 0 || last < params.volume_window {
        return Err(SkipReason::InsufficientHistory { bars: bars.len() });
    }
    let prior = &bars[last - params.volume_window..last];
    let volume_avg = prior.iter().map(|b| b.volume as f64).sum::<f64>() / prior.len() as f64;

    // MA[i] - MA[i-1] = (close[i] - close[i-window]) / window，直接比较收盘价，避免浮点累加误差
    let curr = &bars[last];
    let leaving = &bars[last - params.ma_window];
    Ok(Reading {
        ma_rising: curr.close > leaving.close,
        close: curr.close,
        ma: curr_ma,
        dist: (curr.close - curr_ma) / curr_ma,
        volume: curr.volume as f64,
        volume_avg,
    })
}

/// 对一只股票的K线序列求值
pub fn evaluate(bars: &[Bar], params: &SignalParams) -> Result<Evaluation, SkipReason> {
    let reading = read_latest(bars, params)?;
    Ok(Evaluation {
        reading,
        advice: classify(&reading, params),
    })
}

/// 保留两位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 组装最终输出的信号
pub fn build_signal(code: &str, name: &str, evaluation: &Evaluation) -> Signal {
    let Evaluation { reading, advice } = *evaluation;
    Signal {
        code: code.to_string(),
        name: name.to_string(),
        price: reading.close,
        ma10: round2(reading.ma),
        distance: format!("{:.2}%", reading.dist * 100.0),
        distance_ratio: reading.dist,
        category: advice,
        advice: advice.text().to_string(),
        score: advice.score(),
    }
}
