//! 会话消息模型

use serde::{Deserialize, Serialize};

use crate::models::chat::FormatKind;

/// 一条消息：说话人 + 内容
///
/// 由页面内提取脚本返回，顺序与页面展示顺序一致
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: String,
    pub text: String,
}

/// 提取并渲染完成后的临时载荷
///
/// 只在提取器和持久化通道之间流转，落盘或触发下载后即丢弃
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub text: String,
    pub format: FormatKind,
}
