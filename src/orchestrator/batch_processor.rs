//! 批量导出应用 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源装配和批次级统计。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：连接浏览器、装配导航器/提取器/持久化通道
//! 2. **任务加载**：从 JSON 文件读取批量导出请求
//! 3. **进度消费**：订阅进度广播并输出日志
//! 4. **资源管理**：持有 Browser 和 Page，确保生命周期正确
//! 5. **全局统计**：汇总所有会话的导出结果

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::extractor::MessageExtractor;
use crate::infrastructure::JsExecutor;
use crate::models::{load_batch_request, ExportStats, JobResult, JobStatus, ProgressEvent};
use crate::orchestrator::batch_runner::{BatchRunner, RunnerOptions};
use crate::persistence::{DownloadChannel, StorageChannel, WriterChannel};
use crate::utils::text::truncate_text;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    page: Page,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        // 连接浏览器（复用已登录的会话）
        let (browser, page) =
            browser::connect_to_browser_and_page(config.browser_debug_port).await?;

        Ok(Self {
            config,
            _browser: browser,
            page,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载批量任务
        info!("\n📁 正在读取任务文件: {}", self.config.chats_file);
        let request = load_batch_request(Path::new(&self.config.chats_file)).await?;
        let total = request.chats.len();

        info!("✓ 共 {} 个会话待导出", total);
        info!("📋 窗口大小 {}，窗口间重置页面\n", self.config.window_size);

        // 装配各组件
        let navigator = browser::PageNavigator::new(
            self.page.clone(),
            Duration::from_millis(self.config.settle_delay_ms),
            Duration::from_secs(self.config.nav_timeout_secs),
        );
        let extractor = MessageExtractor::new(JsExecutor::new(self.page.clone()));
        let mut channel = self.build_channel()?;

        // 进度广播 + 日志消费者
        let (progress_tx, progress_rx) = broadcast::channel(64);
        let progress_task = tokio::spawn(log_progress(progress_rx));

        let options = RunnerOptions {
            window_size: self.config.window_size,
            job_timeout: Duration::from_secs(self.config.job_timeout_secs),
            neutral_url: self.config.neutral_url.clone(),
        };

        let results = {
            let mut runner =
                BatchRunner::new(&navigator, &extractor, &mut channel, options, progress_tx);
            runner.run(&request).await
        };

        channel.shutdown().await;
        let _ = progress_task.await;

        // 输出最终统计
        let mut stats = ExportStats::default();
        for result in &results {
            stats.add_result(result);
        }
        print_final_stats(&stats, &results);

        Ok(())
    }

    /// 按配置选择持久化策略
    fn build_channel(&self) -> Result<StorageChannel> {
        match &self.config.writer_command {
            Some(command) => {
                info!("💾 持久化策略: helper 进程 ({})", command);
                let channel = WriterChannel::spawn(
                    command,
                    &self.config.output_dir,
                    self.config.chunk_size_bytes,
                )?;
                Ok(StorageChannel::Writer(channel))
            }
            None => {
                info!("💾 持久化策略: 浏览器直接下载");
                Ok(StorageChannel::Download(DownloadChannel::new(
                    JsExecutor::new(self.page.clone()),
                )))
            }
        }
    }
}

/// 进度日志消费者（"UI"）
///
/// 广播接收失败（滞后/关闭）不影响批次，滞后时丢弃旧事件继续
async fn log_progress(mut rx: broadcast::Receiver<ProgressEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let title = truncate_text(&event.title, 24);
                match event.status {
                    JobStatus::Navigating => {
                        info!("[会话 {}/{}] 🧭 正在打开: {}", event.current, event.total, title)
                    }
                    JobStatus::Extracting => {
                        info!("[会话 {}/{}] 🔍 正在提取: {}", event.current, event.total, title)
                    }
                    JobStatus::Saving => {
                        info!("[会话 {}/{}] 💾 正在保存: {}", event.current, event.total, title)
                    }
                    JobStatus::Done => {
                        info!("[会话 {}/{}] ✅ 完成: {}", event.current, event.total, title)
                    }
                    JobStatus::Skipped => {
                        info!("[会话 {}/{}] ⏭️ 已存在，跳过: {}", event.current, event.total, title)
                    }
                    JobStatus::Error => error!(
                        "[会话 {}/{}] ❌ {}: {}",
                        event.current,
                        event.total,
                        title,
                        event.error_detail.as_deref().unwrap_or("未知错误")
                    ),
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("进度日志滞后，丢弃 {} 条事件", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量会话导出模式");
    info!("🔌 浏览器端口: {}", config.browser_debug_port);
    info!("📦 窗口大小: {}", config.window_size);
    if config.verbose_logging {
        info!("⚙️ 完整配置: {:?}", config);
    }
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &ExportStats, results: &[JobResult]) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部导出完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total());
    info!("⏭️ 已存在跳过: {}", stats.skipped);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));

    for result in results.iter().filter(|r| !r.success) {
        error!(
            "  失败: {} - {}",
            result.title,
            result.error_detail.as_deref().unwrap_or("未知错误")
        );
    }
}
