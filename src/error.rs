//! 应用程序错误类型
//!
//! 单个会话导出流水线中产生的所有错误都归入 [`ExportError`]，
//! 在编排层的任务边界处被捕获并转换为失败的 `JobResult`，
//! 绝不会中断整个批次。

use thiserror::Error;

/// 错误类别（用于 JobResult 的统计和展示）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 导航超时
    NavigationTimeout,
    /// 提取超时
    ExtractionTimeout,
    /// 页面上没有找到消息
    NoMessagesFound,
    /// 无法识别的聊天平台
    UnrecognizedPlatform,
    /// 存储失败（写盘失败或分块传输异常）
    StoreError,
    /// 通道级通信失败（helper 进程或页面）
    CommunicationError,
}

/// 导出流程错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 页面在超时时间内没有加载完成
    #[error("导航超时 ({timeout_secs} 秒): {url}")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// 单个会话的提取步骤超过了墙钟上限
    #[error("提取超时 ({timeout_secs} 秒)")]
    ExtractionTimeout { timeout_secs: u64 },

    /// 页面结构可以识别，但没有提取到任何消息
    #[error("页面上没有找到任何消息")]
    NoMessagesFound,

    /// URL 不属于任何已知的聊天平台
    #[error("无法识别的聊天平台: {url}")]
    UnrecognizedPlatform { url: String },

    /// 持久化失败：写文件失败、分块传输被拒绝等
    #[error("存储失败: {0}")]
    Store(String),

    /// 与 helper 进程或页面的通道级失败
    #[error("通信失败: {0}")]
    Communication(String),
}

impl ExportError {
    /// 返回对应的错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::NavigationTimeout { .. } => ErrorKind::NavigationTimeout,
            ExportError::ExtractionTimeout { .. } => ErrorKind::ExtractionTimeout,
            ExportError::NoMessagesFound => ErrorKind::NoMessagesFound,
            ExportError::UnrecognizedPlatform { .. } => ErrorKind::UnrecognizedPlatform,
            ExportError::Store(_) => ErrorKind::StoreError,
            ExportError::Communication(_) => ErrorKind::CommunicationError,
        }
    }
}
