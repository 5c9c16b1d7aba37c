//! 浏览器直接下载（退化策略）
//!
//! 在页面里注入 Blob + 锚点点击触发下载。宿主环境不会回报下载
//! 是否完成，所以触发成功即视为存储成功；存在性检查永远报告
//! 不存在（没有可查询的目标）。

use tracing::debug;

use crate::error::ExportError;
use crate::infrastructure::JsExecutor;
use crate::persistence::DestinationKey;

/// 浏览器下载通道
pub struct DownloadChannel {
    executor: JsExecutor,
}

impl DownloadChannel {
    pub fn new(executor: JsExecutor) -> Self {
        Self { executor }
    }

    pub async fn store(
        &mut self,
        key: &DestinationKey,
        content: &str,
    ) -> Result<String, ExportError> {
        let js = download_js(&key.file_name, content);

        self.executor
            .eval(js)
            .await
            .map_err(|e| ExportError::Store(format!("触发下载失败: {}", e)))?;

        debug!("已触发下载: {}", key.file_name);
        Ok(key.file_name.clone())
    }

    pub async fn exists(&mut self, _key: &DestinationKey) -> Result<bool, ExportError> {
        Ok(false)
    }
}

fn download_js(file_name: &str, content: &str) -> String {
    let file_name_json = serde_json::to_string(file_name).unwrap_or_else(|_| "\"export\"".into());
    let content_json = serde_json::to_string(content).unwrap_or_default();

    format!(
        r#"
        (() => {{
            const content = {content};
            const fileName = {file_name};
            const blob = new Blob([content], {{ type: 'text/plain;charset=utf-8' }});
            const url = URL.createObjectURL(blob);
            const a = document.createElement('a');
            a.href = url;
            a.download = fileName;
            document.body.appendChild(a);
            a.click();
            a.remove();
            setTimeout(() => URL.revokeObjectURL(url), 1000);
            return true;
        }})()
        "#,
        content = content_json,
        file_name = file_name_json,
    )
}
