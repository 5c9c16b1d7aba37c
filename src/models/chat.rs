//! 批量任务数据模型
//!
//! 对应 UI 侧提交的批量请求：`{chats: [{id, title, url}], format}`

use serde::{Deserialize, Serialize};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Markdown,
    Html,
    Plaintext,
}

impl FormatKind {
    /// 对应的文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Markdown => "md",
            FormatKind::Html => "html",
            FormatKind::Plaintext => "txt",
        }
    }
}

/// 单个待导出的会话
///
/// 身份由 `id` 决定；创建后不可变，被编排循环消费一次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatJob {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// 一次批量导出请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub chats: Vec<ChatJob>,
    pub format: FormatKind,
}
