//! 会话导出结果与批次统计

use crate::error::{ErrorKind, ExportError};

/// 单个会话的终态记录
///
/// 不论内部经历多少步骤，每个会话恰好产出一条；
/// `success == true` 时 `error_kind` 为空，失败时 `error_detail` 必定存在
#[derive(Debug, Clone)]
pub struct JobResult {
    pub title: String,
    pub success: bool,
    pub message_count: Option<usize>,
    pub destination: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
}

impl JobResult {
    /// 导出成功
    pub fn succeeded(title: &str, message_count: usize, destination: String) -> Self {
        Self {
            title: title.to_string(),
            success: true,
            message_count: Some(message_count),
            destination: Some(destination),
            error_kind: None,
            error_detail: None,
        }
    }

    /// 目标文件已存在，跳过（视为成功）
    pub fn skipped(title: &str, destination: String) -> Self {
        Self {
            title: title.to_string(),
            success: true,
            message_count: None,
            destination: Some(destination),
            error_kind: None,
            error_detail: None,
        }
    }

    /// 导出失败
    pub fn failed(title: &str, error: &ExportError) -> Self {
        Self {
            title: title.to_string(),
            success: false,
            message_count: None,
            destination: None,
            error_kind: Some(error.kind()),
            error_detail: Some(error.to_string()),
        }
    }
}

/// 批次统计
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportStats {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExportStats {
    pub fn add_result(&mut self, result: &JobResult) {
        if !result.success {
            self.failed += 1;
        } else if result.message_count.is_none() {
            self.skipped += 1;
        } else {
            self.success += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}
