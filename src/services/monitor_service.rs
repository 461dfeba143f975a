//! 监控服务
//!
//! 逐只股票拉取K线、计算信号，汇总成按排序分降序的监控报告。
//! 单只股票失败只会记为跳过，不会中断整批。

use std::sync::Arc;

use crate::models::{
    rank, top_picks, AnalysisOutcome, MonitorReport, SkipReason, SkippedTicker, TOP_PICK_NOTE,
};
use crate::services::name_resolver::{NameResolver, NameSnapshot};
use crate::services::signal_engine::{build_signal, evaluate, SignalParams};
use crate::services::stock::common::get_beijing_time;
use crate::services::stock::BarSource;

pub const EMPTY_WATCHLIST_MESSAGE: &str = "请先添加股票开始监控。";
pub const NO_VALID_DATA_MESSAGE: &str = "暂无有效数据。";

pub struct MonitorService {
    bars: Arc<dyn BarSource>,
    names: NameResolver,
    params: SignalParams,
    history_limit: usize,
}

impl MonitorService {
    pub fn new(
        bars: Arc<dyn BarSource>,
        names: NameResolver,
        params: SignalParams,
        history_limit: usize,
    ) -> Self {
        Self {
            bars,
            names,
            params,
            history_limit,
        }
    }

    /// 分析单只股票
    pub async fn analyze(&self, code: &str, names: &NameSnapshot) -> AnalysisOutcome {
        let skipped = |reason: SkipReason| {
            log::warn!("⏭️ 跳过 {}: {}", code, reason);
            AnalysisOutcome::Skipped(SkippedTicker {
                code: code.to_string(),
                reason,
            })
        };

        let bars = match self.bars.fetch_daily_bars(code, self.history_limit).await {
            Ok(bars) if bars.is_empty() => {
                return skipped(SkipReason::DataUnavailable("未返回K线".to_string()))
            }
            Ok(bars) => bars,
            Err(e) => return skipped(SkipReason::DataUnavailable(format!("{:#}", e))),
        };

        match evaluate(&bars, &self.params) {
            Ok(evaluation) => {
                let signal = build_signal(code, &names.resolve(code), &evaluation);
                log::debug!("✅ {} {} 排序分 {}", signal.code, signal.name, signal.score);
                AnalysisOutcome::Signal(signal)
            }
            Err(reason) => skipped(reason),
        }
    }

    /// 单只股票的即时分析，使用当前名称表
    pub async fn analyze_one(&self, code: &str) -> AnalysisOutcome {
        let names = self.names.snapshot().await;
        self.analyze(code, &names).await
    }

    /// 按顺序分析整份名单，每完成一只调用一次 `on_progress(已完成, 总数)`
    pub async fn run<F>(&self, codes: &[String], mut on_progress: F) -> MonitorReport
    where
        F: FnMut(usize, usize),
    {
        let total = codes.len();
        if total == 0 {
            return MonitorReport {
                rows: Vec::new(),
                top_picks: Vec::new(),
                top_pick_note: None,
                skipped: Vec::new(),
                total,
                message: Some(EMPTY_WATCHLIST_MESSAGE.to_string()),
                generated_at: get_beijing_time(),
            };
        }

        let names = self.names.snapshot().await;
        if names.is_empty() {
            log::warn!("名称表为空，本次名称将显示为 unknown");
        } else {
            log::debug!("名称表共 {} 条", names.len());
        }
        let mut signals = Vec::new();
        let mut skipped = Vec::new();

        for (idx, code) in codes.iter().enumerate() {
            match self.analyze(code, &names).await {
                AnalysisOutcome::Signal(signal) => signals.push(signal),
                AnalysisOutcome::Skipped(skip) => skipped.push(skip),
            }
            on_progress(idx + 1, total);
        }

        let rows = rank(signals);
        let picks = top_picks(&rows);
        let message = if rows.is_empty() {
            Some(NO_VALID_DATA_MESSAGE.to_string())
        } else if !picks.is_empty() {
            Some(format!("🎯 发现符合【回踩起爆】条件的标的：{} 只", picks.len()))
        } else {
            None
        };

        log::info!(
            "📊 监控完成: 共 {} 只，有效 {} 只，跳过 {} 只，重点推荐 {} 只",
            total,
            rows.len(),
            skipped.len(),
            picks.len()
        );

        MonitorReport {
            top_pick_note: (!picks.is_empty()).then(|| TOP_PICK_NOTE.to_string()),
            rows,
            top_picks: picks,
            skipped,
            total,
            message,
            generated_at: get_beijing_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Advice, Bar};
    use crate::services::name_resolver::{NameCache, NameMap};
    use crate::services::stock::NameSource;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use std::collections::HashMap;
    use std::time::Duration;

    fn series(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (c, v))| Bar::from_close(start + ChronoDuration::days(i as i64), *c, *v))
            .collect()
    }

    /// 每种建议各一条样本序列
    fn sample_bars(advice: Advice) -> Vec<Bar> {
        let mut closes = vec![10.0; 10];
        let mut volumes = vec![1000; 10];
        let (last, last_volume) = match advice {
            Advice::PrimeEntry => (10.2, 800),
            Advice::Caution => (10.2, 1500),
            Advice::Overbought => (12.0, 1000),
            Advice::Uptrend => (10.5, 1000),
            Advice::Breakdown => (9.0, 1000),
            Advice::Sideways => (10.0, 1000),
        };
        closes.push(last);
        volumes.push(last_volume);
        series(&closes, &volumes)
    }

    /// 预置数据的假K线源，未知代码返回错误
    struct FakeBars {
        data: HashMap<String, Vec<Bar>>,
    }

    #[async_trait]
    impl BarSource for FakeBars {
        async fn fetch_daily_bars(&self, code: &str, _limit: usize) -> Result<Vec<Bar>> {
            self.data
                .get(code)
                .cloned()
                .ok_or_else(|| anyhow!("connection reset"))
        }
    }

    struct FakeNames {
        fail: bool,
    }

    #[async_trait]
    impl NameSource for FakeNames {
        async fn fetch_name_map(&self) -> Result<NameMap> {
            if self.fail {
                return Err(anyhow!("snapshot unavailable"));
            }
            Ok(NameMap::from([
                ("301005".to_string(), "超研股份".to_string()),
                ("600000".to_string(), "浦发银行".to_string()),
            ]))
        }
    }

    fn service(data: Vec<(&str, Vec<Bar>)>, names_fail: bool) -> MonitorService {
        let bars = FakeBars {
            data: data.into_iter().map(|(c, b)| (c.to_string(), b)).collect(),
        };
        let names = NameResolver::new(
            Arc::new(FakeNames { fail: names_fail }),
            NameCache::new(Duration::from_secs(3600)),
        );
        MonitorService::new(Arc::new(bars), names, SignalParams::default(), 30)
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    /// 测试整批监控：排序、重点推荐、跳过与进度
    #[tokio::test]
    async fn test_run_ranks_and_collects_skips() {
        println!("\n========== 测试整批监控 ==========");
        let svc = service(
            vec![
                ("000001", sample_bars(Advice::Overbought)),
                ("000002", sample_bars(Advice::Sideways)),
                ("301005", sample_bars(Advice::PrimeEntry)),
                ("000004", sample_bars(Advice::Breakdown)),
                ("600000", sample_bars(Advice::Caution)),
                ("000006", Vec::new()),
                ("000007", series(&[10.0; 5], &[1000; 5])),
            ],
            false,
        );

        let mut progress = Vec::new();
        let report = svc
            .run(
                &codes(&["000001", "000002", "301005", "000004", "600000", "000006", "000007", "999999"]),
                |done, total| progress.push((done, total)),
            )
            .await;

        let scores: Vec<i32> = report.rows.iter().map(|s| s.score).collect();
        println!("  排序分: {:?}", scores);
        assert_eq!(scores, vec![3, 2, 0, -1, -2]);
        assert_eq!(report.total, 8);

        assert_eq!(report.top_picks.len(), 1);
        assert_eq!(report.top_picks[0].code, "301005");
        assert_eq!(report.top_picks[0].name, "超研股份");
        assert!(report.top_pick_note.is_some());
        assert!(report.message.as_deref().unwrap().contains("1 只"));

        let skipped: Vec<(&str, &SkipReason)> = report
            .skipped
            .iter()
            .map(|s| (s.code.as_str(), &s.reason))
            .collect();
        println!("  跳过: {:?}", skipped);
        assert_eq!(skipped.len(), 3);
        assert!(matches!(skipped[0], ("000006", SkipReason::DataUnavailable(_))));
        assert_eq!(skipped[1], ("000007", &SkipReason::InsufficientHistory { bars: 5 }));
        assert!(matches!(skipped[2], ("999999", SkipReason::DataUnavailable(_))));

        assert_eq!(progress.len(), 8);
        assert_eq!(progress.first(), Some(&(1, 8)));
        assert_eq!(progress.last(), Some(&(8, 8)));
        println!("✅ 整批监控测试通过！");
    }

    #[tokio::test]
    async fn test_run_with_empty_watchlist() {
        let svc = service(Vec::new(), false);
        let mut calls = 0;
        let report = svc.run(&[], |_, _| calls += 1).await;

        assert!(report.rows.is_empty());
        assert_eq!(report.message.as_deref(), Some(EMPTY_WATCHLIST_MESSAGE));
        assert_eq!(calls, 0);
    }

    /// 测试全部失败时的提示
    #[tokio::test]
    async fn test_run_all_skipped_reports_no_valid_data() {
        let svc = service(Vec::new(), false);
        let report = svc.run(&codes(&["600000", "000001"]), |_, _| {}).await;

        assert!(report.rows.is_empty());
        assert!(report.top_picks.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.message.as_deref(), Some(NO_VALID_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn test_run_without_top_picks_has_no_message() {
        let svc = service(vec![("600000", sample_bars(Advice::Uptrend))], false);
        let report = svc.run(&codes(&["600000"]), |_, _| {}).await;

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].category, Advice::Uptrend);
        assert!(report.message.is_none());
        assert!(report.top_pick_note.is_none());
    }

    /// 测试名称表失败不影响信号计算
    #[tokio::test]
    async fn test_name_failure_does_not_block_signals() {
        println!("\n========== 测试名称表失败降级 ==========");
        let svc = service(vec![("301005", sample_bars(Advice::PrimeEntry))], true);

        let outcome = svc.analyze_one("301005").await;
        let signal = outcome.signal().expect("应产生信号");
        println!("  {} {} -> {}", signal.code, signal.name, signal.score);

        assert_eq!(signal.name, "unknown");
        assert_eq!(signal.score, 3);
        println!("✅ 名称表失败降级测试通过！");
    }

    #[tokio::test]
    async fn test_analyze_one_fetch_error_is_skipped() {
        let svc = service(Vec::new(), false);
        match svc.analyze_one("600000").await {
            AnalysisOutcome::Skipped(skip) => {
                assert_eq!(skip.code, "600000");
                assert!(matches!(skip.reason, SkipReason::DataUnavailable(ref msg) if msg.contains("connection reset")));
            }
            other => panic!("应被跳过: {:?}", other),
        }
    }
}
