//! 自选股名单
//!
//! 有序、去重的 6 位股票代码集合

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::services::stock::common::is_valid_code;

#[derive(Debug, Error, PartialEq)]
pub enum WatchListError {
    #[error("无效的股票代码: {0}，应为 6 位数字")]
    InvalidCode(String),
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]{6}").expect("合法的正则表达式"))
}

/// 从任意文本中按顺序提取所有 6 位数字
pub fn extract_codes(text: &str) -> Vec<String> {
    code_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct WatchList {
    codes: Vec<String>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 手动添加单只股票，已存在时返回 false
    pub fn add(&mut self, code: &str) -> Result<bool, WatchListError> {
        let code = code.trim();
        if !is_valid_code(code) {
            return Err(WatchListError::InvalidCode(code.to_string()));
        }
        if self.contains(code) {
            return Ok(false);
        }
        self.codes.push(code.to_string());
        Ok(true)
    }

    /// 批量粘贴同步，返回新增数量
    pub fn sync_from_text(&mut self, text: &str) -> usize {
        let mut added = 0;
        for code in extract_codes(text) {
            if !self.contains(&code) {
                self.codes.push(code);
                added += 1;
            }
        }
        added
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.codes.len();
        self.codes.retain(|c| c != code);
        self.codes.len() != before
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
