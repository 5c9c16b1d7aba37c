use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::models::chat::BatchRequest;

/// 从 JSON 文件加载批量导出请求
///
/// 文件格式：`{"chats": [{"id", "title", "url"}, ...], "format": "markdown"}`
pub async fn load_batch_request(path: &Path) -> Result<BatchRequest> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取任务文件: {}", path.display()))?;

    let request: BatchRequest = serde_json::from_str(&content)
        .with_context(|| format!("无法解析任务文件: {}", path.display()))?;

    if request.chats.is_empty() {
        anyhow::bail!("任务文件中没有任何会话: {}", path.display());
    }

    tracing::info!("成功加载 {} 个会话", request.chats.len());

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::FormatKind;

    #[tokio::test]
    async fn test_load_batch_request() {
        let dir = std::env::temp_dir().join("export_chat_history_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chats.json");
        std::fs::write(
            &path,
            r#"{"chats":[{"id":"c1","title":"第一次对话","url":"https://chatgpt.com/c/abc"}],"format":"markdown"}"#,
        )
        .unwrap();

        let request = load_batch_request(&path).await.unwrap();
        assert_eq!(request.chats.len(), 1);
        assert_eq!(request.chats[0].id, "c1");
        assert_eq!(request.format, FormatKind::Markdown);
    }

    #[tokio::test]
    async fn test_empty_chats_rejected() {
        let dir = std::env::temp_dir().join("export_chat_history_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(&path, r#"{"chats":[],"format":"html"}"#).unwrap();

        assert!(load_batch_request(&path).await.is_err());
    }
}
