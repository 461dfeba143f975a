//! 自选股请求/响应模型

use serde::{Deserialize, Serialize};

/// 手动添加单只股票
#[derive(Debug, Deserialize)]
pub struct AddCodeRequest {
    /// 6 位股票代码，如 301005
    pub code: String,
}

/// 批量粘贴同步
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// 任意粘贴文本，从中提取所有 6 位数字代码
    pub text: String,
}

/// 自选股列表
#[derive(Debug, Serialize)]
pub struct WatchListView {
    pub codes: Vec<String>,
    pub total: usize,
}

/// 批量同步结果
#[derive(Debug, Serialize)]
pub struct SyncResult {
    /// 本次新增数量
    pub added: usize,
    pub codes: Vec<String>,
}
