//! 导航控制器
//!
//! 驱动同一个页面上下文依次访问一串目标地址，并判断每次导航
//! 何时达到"可用且稳定"的状态。
//!
//! "加载完成"信号在单页应用水合动态内容之前就会触发，所以在
//! 收到信号后再固定等待一个静默窗口（秒级）作为就绪启发。
//! 这是一个务实的折中：延迟选得合适时误判很少见，真正需要
//! 精确判断的场景（比如枚举滚动列表）由提取器用
//! [`crate::utils::stabilize`] 的重复采样模式自行兜底。

use std::time::Duration;

use chromiumoxide::Page;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::error::ExportError;

/// 导航能力（编排层只通过这个 trait 使用页面导航）
pub trait Navigate {
    /// 导航到目标地址并等待页面就绪
    ///
    /// 超过导航超时仍未加载完成时返回 `NavigationTimeout`；
    /// 调用方应将其作为单个会话的失败处理，不应中断批次
    fn navigate_and_wait(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<(), ExportError>> + Send;

    /// 尽力而为地把页面重置到中性地址（窗口间的内存卫生步骤）
    ///
    /// 任何失败都只记日志，绝不向调用方返回错误
    fn reset_best_effort(&self, neutral_url: &str) -> impl std::future::Future<Output = ()> + Send;
}

/// 基于 chromiumoxide Page 的导航控制器
pub struct PageNavigator {
    page: Page,
    /// 加载完成信号后的静默窗口
    settle_delay: Duration,
    /// 单次导航的超时上限
    nav_timeout: Duration,
}

impl PageNavigator {
    pub fn new(page: Page, settle_delay: Duration, nav_timeout: Duration) -> Self {
        Self {
            page,
            settle_delay,
            nav_timeout,
        }
    }

    async fn goto_and_settle(&self, url: &str) -> Result<(), ExportError> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| ExportError::Communication(format!("导航到 {} 失败: {}", url, e)))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| ExportError::Communication(format!("等待页面加载失败: {}", e)))?;
            Ok::<(), ExportError>(())
        };

        match timeout(self.nav_timeout, navigation).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ExportError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: self.nav_timeout.as_secs(),
                });
            }
        }

        // 静默窗口：等待客户端渲染的内容填充完成
        debug!("页面加载完成，静默等待 {:?}", self.settle_delay);
        sleep(self.settle_delay).await;

        Ok(())
    }
}

impl Navigate for PageNavigator {
    async fn navigate_and_wait(&self, url: &str) -> Result<(), ExportError> {
        debug!("导航到: {}", url);
        self.goto_and_settle(url).await
    }

    async fn reset_best_effort(&self, neutral_url: &str) {
        debug!("窗口结束，重置页面到: {}", neutral_url);
        if let Err(e) = self.goto_and_settle(neutral_url).await {
            warn!("页面重置失败: {}，继续处理下一个窗口", e);
        }
    }
}
