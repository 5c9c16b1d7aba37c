//! 内容提取器
//!
//! 对编排层只暴露一个能力："为当前加载的页面提取消息列表"。
//! 各平台的选择器差异被封装在 [`platform`] 和 [`scripts`] 里。

pub mod platform;
pub mod scripts;

use std::time::Duration;

use tracing::{debug, info};

use crate::error::ExportError;
use crate::infrastructure::JsExecutor;
use crate::models::{ChatMessage, FormatKind};
use crate::utils::stabilize::sample_until_stable;

/// 滚动采样：连续多少轮消息数不变视为稳定
const STABLE_ROUNDS: usize = 3;
/// 滚动采样轮数上限
const MAX_SAMPLE_ROUNDS: usize = 30;
/// 滚动采样间隔
const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// 内容提取能力（编排层的协作者接口）
pub trait ExtractContent {
    /// 为当前加载的页面提取消息列表
    ///
    /// 页面结构无法识别时返回 `UnrecognizedPlatform`；
    /// 识别成功但没有消息时返回 `NoMessagesFound`
    fn extract(
        &self,
        format: FormatKind,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, ExportError>> + Send;
}

/// 基于页面内 JS 的消息提取器
pub struct MessageExtractor {
    executor: JsExecutor,
}

impl MessageExtractor {
    pub fn new(executor: JsExecutor) -> Self {
        Self { executor }
    }

    /// 滚动页面直到消息数量稳定（惰性加载的会话需要多轮滚动）
    async fn stabilize_message_list(&self, count_js: String) -> Result<usize, ExportError> {
        let executor = &self.executor;
        let count = sample_until_stable(
            move || {
                let js = count_js.clone();
                async move {
                    let n: usize = executor.eval_as(js).await?;
                    Ok(n)
                }
            },
            STABLE_ROUNDS,
            MAX_SAMPLE_ROUNDS,
            SAMPLE_INTERVAL,
        )
        .await
        .map_err(|e| ExportError::Communication(format!("滚动采样失败: {}", e)))?;

        Ok(count)
    }
}

impl ExtractContent for MessageExtractor {
    async fn extract(&self, format: FormatKind) -> Result<Vec<ChatMessage>, ExportError> {
        let url = self
            .executor
            .current_url()
            .await
            .map_err(|e| ExportError::Communication(format!("获取页面 URL 失败: {}", e)))?
            .unwrap_or_default();

        let platform = platform::Platform::from_url(&url)
            .ok_or_else(|| ExportError::UnrecognizedPlatform { url: url.clone() })?;
        debug!("识别到平台: {}", platform.name());

        let selectors = platform.selectors();

        // 先滚动到消息列表稳定，再一次性提取
        let count = self
            .stabilize_message_list(scripts::message_count_js(&selectors))
            .await?;
        debug!("消息列表稳定，共 {} 个节点", count);

        let use_html = format == FormatKind::Html;
        let messages: Vec<ChatMessage> = self
            .executor
            .eval_as(scripts::extraction_js(&selectors, use_html))
            .await
            .map_err(|e| ExportError::Communication(format!("执行提取脚本失败: {}", e)))?;

        if messages.is_empty() {
            return Err(ExportError::NoMessagesFound);
        }

        info!("✓ 提取到 {} 条消息", messages.len());
        Ok(messages)
    }
}
