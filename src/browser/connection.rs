use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::extractor::platform::Platform;

/// 连接到浏览器并获取页面
///
/// 假定用户已经在该浏览器中登录了目标聊天平台；
/// 优先复用已打开的聊天平台页面（保留其登录态和渲染上下文），
/// 一个都没有时创建空白页面，交给导航控制器驱动
pub async fn connect_to_browser_and_page(port: u16) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    let mut urls = Vec::with_capacity(pages.len());
    for p in pages.iter() {
        urls.push(p.url().await.ok().flatten());
    }

    if let Some(index) = find_platform_page(&urls) {
        info!(
            "✓ 复用已打开的聊天平台页面: {}",
            urls[index].as_deref().unwrap_or("")
        );
        let page = pages[index].clone();
        let _ = page.activate().await;
        return Ok((browser, page));
    }

    debug!("没有已打开的聊天平台页面，创建空白页面");
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建空白页面失败: {}", e);
        e
    })?;

    Ok((browser, page))
}

/// 在页面 URL 列表中找出第一个属于已知聊天平台的页面
fn find_platform_page(urls: &[Option<String>]) -> Option<usize> {
    urls.iter()
        .position(|url| url.as_deref().is_some_and(|u| Platform::from_url(u).is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_platform_page_prefers_first_match() {
        let urls = vec![
            Some("https://example.com/".to_string()),
            None,
            Some("https://claude.ai/chat/abc".to_string()),
            Some("https://chatgpt.com/c/def".to_string()),
        ];
        assert_eq!(find_platform_page(&urls), Some(2));
    }

    #[test]
    fn test_find_platform_page_none_without_platform() {
        let urls = vec![
            Some("https://example.com/".to_string()),
            Some("about:blank".to_string()),
            None,
        ];
        assert_eq!(find_platform_page(&urls), None);
        assert_eq!(find_platform_page(&[]), None);
    }
}
