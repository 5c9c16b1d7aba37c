//! helper 进程的请求/响应消息

use serde::{Deserialize, Serialize};

/// 发往 helper 进程的请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WriterRequest {
    /// 一次性写入整个文件
    #[serde(rename_all = "camelCase")]
    Write {
        dir_name: String,
        file_name: String,
        content: String,
    },
    /// 写入一个分块；`final` 为 true 时 helper 拼接全部分块并落盘。
    /// `abort` 为 true 时丢弃该键已累积的分块（半途失败后的清理），不落盘
    #[serde(rename_all = "camelCase")]
    WriteChunk {
        dir_name: String,
        file_name: String,
        data: String,
        #[serde(rename = "final")]
        is_final: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        abort: bool,
    },
    /// 检查目标文件是否已存在
    #[serde(rename_all = "camelCase")]
    CheckExists {
        dir_name: String,
        file_name: String,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// helper 进程的响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl WriterResponse {
    /// 写入成功
    pub fn written(path: String) -> Self {
        Self {
            success: true,
            path: Some(path),
            ..Default::default()
        }
    }

    /// 分块已接收（还没有落盘）
    pub fn chunk_received() -> Self {
        Self {
            success: true,
            status: Some("chunk_received".to_string()),
            ..Default::default()
        }
    }

    /// 半途分块已丢弃
    pub fn chunk_discarded() -> Self {
        Self {
            success: true,
            status: Some("chunk_discarded".to_string()),
            ..Default::default()
        }
    }

    /// 存在性检查结果
    pub fn existence(exists: bool) -> Self {
        Self {
            success: true,
            exists: Some(exists),
            ..Default::default()
        }
    }

    /// 失败
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Default::default()
        }
    }
}
