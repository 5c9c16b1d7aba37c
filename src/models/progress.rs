//! 进度事件
//!
//! 广播给任何正在监听的 UI；没有投递保证，监听者丢失不影响批处理

use serde::{Deserialize, Serialize};

/// 单个会话当前所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Navigating,
    Extracting,
    Saving,
    Done,
    Skipped,
    Error,
}

/// 进度通知（即发即弃）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 当前会话序号（从 1 开始）
    pub current: usize,
    /// 会话总数
    pub total: usize,
    pub title: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}
