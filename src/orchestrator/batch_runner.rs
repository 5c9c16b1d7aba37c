//! 批处理核心循环 - 编排层
//!
//! ## 职责
//!
//! 把 N 个会话导出任务按窗口顺序推过导航 → 提取 → 渲染 → 持久化
//! 流水线，并保证：
//!
//! 1. **结果与任务一一对应**：每个会话恰好产出一条 JobResult，顺序不变
//! 2. **失败隔离**：任何单个会话的失败都在任务边界被捕获，批次继续
//! 3. **内存卫生**：每个窗口结束后（最后一个除外）把页面重置到中性地址
//! 4. **跳过优化**：目标文件已存在时直接记成功，不做任何提取
//! 5. **进度广播**：即发即弃，监听者丢失不影响批次
//!
//! 页面上下文是唯一的共享可变资源，所以窗口内外都严格串行，
//! 绝不并发处理两个会话。

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::browser::Navigate;
use crate::error::ExportError;
use crate::extractor::platform::Platform;
use crate::extractor::ExtractContent;
use crate::formatter;
use crate::models::{BatchRequest, ChatJob, FormatKind, JobResult, JobStatus, ProgressEvent};
use crate::persistence::{DestinationKey, PersistenceChannel};
use crate::utils::text::sanitize_title;

/// 批处理运行参数
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// 每个窗口的会话数
    pub window_size: usize,
    /// 单个会话提取步骤的墙钟上限
    pub job_timeout: Duration,
    /// 窗口间重置页面用的中性地址
    pub neutral_url: String,
}

/// 批处理运行器
pub struct BatchRunner<'a, N, E, P> {
    navigator: &'a N,
    extractor: &'a E,
    channel: &'a mut P,
    options: RunnerOptions,
    progress: broadcast::Sender<ProgressEvent>,
}

impl<'a, N, E, P> BatchRunner<'a, N, E, P>
where
    N: Navigate,
    E: ExtractContent,
    P: PersistenceChannel,
{
    pub fn new(
        navigator: &'a N,
        extractor: &'a E,
        channel: &'a mut P,
        options: RunnerOptions,
        progress: broadcast::Sender<ProgressEvent>,
    ) -> Self {
        Self {
            navigator,
            extractor,
            channel,
            options,
            progress,
        }
    }

    /// 运行整个批次
    ///
    /// 每个提交的会话恰好对应一条结果，顺序与提交顺序一致
    pub async fn run(&mut self, request: &BatchRequest) -> Vec<JobResult> {
        let total = request.chats.len();
        let window_size = self.options.window_size.max(1);
        let window_count = total.div_ceil(window_size);
        let mut results = Vec::with_capacity(total);

        for (window_index, window) in request.chats.chunks(window_size).enumerate() {
            info!(
                "📦 开始处理第 {}/{} 窗口（{} 个会话）",
                window_index + 1,
                window_count,
                window.len()
            );

            for job in window {
                let current = results.len() + 1;
                let result = self.run_job(job, current, total, request.format).await;

                if result.success {
                    info!("[会话 {}/{}] ✓ {}", current, total, job.title);
                } else {
                    error!(
                        "[会话 {}/{}] ❌ {}: {}",
                        current,
                        total,
                        job.title,
                        result.error_detail.as_deref().unwrap_or("未知错误")
                    );
                }
                results.push(result);
            }

            // 长批次会在页面里积累渲染历史和图片，窗口间重置一次
            // 控制内存峰值。最后一个窗口之后不需要
            if window_index + 1 < window_count {
                self.navigator
                    .reset_best_effort(&self.options.neutral_url)
                    .await;
            }
        }

        results
    }

    /// 处理单个会话：所有错误都在这里收口为失败的 JobResult
    async fn run_job(
        &mut self,
        job: &ChatJob,
        current: usize,
        total: usize,
        format: FormatKind,
    ) -> JobResult {
        match self.try_job(job, current, total, format).await {
            Ok(result) => result,
            Err(e) => {
                self.emit(current, total, &job.title, JobStatus::Error, Some(e.to_string()));
                JobResult::failed(&job.title, &e)
            }
        }
    }

    async fn try_job(
        &mut self,
        job: &ChatJob,
        current: usize,
        total: usize,
        format: FormatKind,
    ) -> Result<JobResult, ExportError> {
        let key = destination_key(job, format);

        // 跳过检查：检查本身失败时按"不存在"处理，继续正常导出
        let already_exists = match self.channel.exists(&key).await {
            Ok(exists) => exists,
            Err(e) => {
                debug!("存在性检查失败，按不存在处理: {}", e);
                false
            }
        };
        if already_exists {
            info!("[会话 {}/{}] 目标已存在，跳过: {}", current, total, key);
            self.emit(current, total, &job.title, JobStatus::Skipped, None);
            return Ok(JobResult::skipped(&job.title, key.to_string()));
        }

        self.emit(current, total, &job.title, JobStatus::Navigating, None);
        self.navigator.navigate_and_wait(&job.url).await?;

        self.emit(current, total, &job.title, JobStatus::Extracting, None);
        let messages = match timeout(self.options.job_timeout, self.extractor.extract(format)).await
        {
            Ok(extracted) => extracted?,
            Err(_) => {
                return Err(ExportError::ExtractionTimeout {
                    timeout_secs: self.options.job_timeout.as_secs(),
                });
            }
        };

        let content = formatter::render(&job.title, &messages, format);

        self.emit(current, total, &job.title, JobStatus::Saving, None);
        let destination = self.channel.store(&key, &content.text).await?;

        self.emit(current, total, &job.title, JobStatus::Done, None);
        Ok(JobResult::succeeded(&job.title, messages.len(), destination))
    }

    /// 广播进度（即发即弃：没有监听者时发送失败，直接忽略）
    fn emit(
        &self,
        current: usize,
        total: usize,
        title: &str,
        status: JobStatus,
        error_detail: Option<String>,
    ) {
        let event = ProgressEvent {
            current,
            total,
            title: title.to_string(),
            status,
            error_detail,
        };
        if self.progress.send(event).is_err() {
            // 没有任何监听者，不影响批次
        }
    }
}

/// 从任务计算目标键
///
/// 目录按平台分组（识别不了的归入 Other），文件名由标题清洗而来
fn destination_key(job: &ChatJob, format: FormatKind) -> DestinationKey {
    let dir_name = Platform::from_url(&job.url)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "Other".to_string());
    let file_name = format!("{}.{}", sanitize_title(&job.title), format.extension());
    DestinationKey::new(dir_name, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::models::ChatMessage;

    fn job(n: usize) -> ChatJob {
        ChatJob {
            id: format!("chat-{}", n),
            title: format!("会话 {}", n),
            url: format!("https://chatgpt.com/c/{}", n),
        }
    }

    fn request(count: usize) -> BatchRequest {
        BatchRequest {
            chats: (1..=count).map(job).collect(),
            format: FormatKind::Markdown,
        }
    }

    fn options(window_size: usize) -> RunnerOptions {
        RunnerOptions {
            window_size,
            job_timeout: Duration::from_secs(5),
            neutral_url: "about:blank".to_string(),
        }
    }

    #[derive(Default)]
    struct MockNavigator {
        resets: Mutex<usize>,
        fail_urls: HashSet<String>,
    }

    impl Navigate for MockNavigator {
        async fn navigate_and_wait(&self, url: &str) -> Result<(), ExportError> {
            if self.fail_urls.contains(url) {
                return Err(ExportError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: 30,
                });
            }
            Ok(())
        }

        async fn reset_best_effort(&self, _neutral_url: &str) {
            *self.resets.lock().unwrap() += 1;
        }
    }

    /// 按调用顺序弹出预设结果；耗尽后默认成功
    #[derive(Default)]
    struct MockExtractor {
        calls: Mutex<usize>,
        outcomes: Mutex<Vec<Result<usize, ExportError>>>,
        delay: Option<Duration>,
    }

    impl MockExtractor {
        fn with_outcomes(outcomes: Vec<Result<usize, ExportError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ExtractContent for MockExtractor {
        async fn extract(&self, _format: FormatKind) -> Result<Vec<ChatMessage>, ExportError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = {
                let mut outcomes = self.outcomes.lock().unwrap();
                if outcomes.is_empty() {
                    Ok(2)
                } else {
                    outcomes.remove(0)
                }
            };

            outcome.map(|count| {
                (0..count)
                    .map(|i| ChatMessage {
                        speaker: if i % 2 == 0 { "User" } else { "Assistant" }.to_string(),
                        text: format!("消息 {}", i),
                    })
                    .collect()
            })
        }
    }

    #[derive(Default)]
    struct MockChannel {
        existing: HashSet<String>,
        stored: Mutex<Vec<String>>,
        fail_exists_check: bool,
        fail_store_keys: HashSet<String>,
    }

    impl PersistenceChannel for MockChannel {
        async fn store(
            &mut self,
            key: &DestinationKey,
            _content: &str,
        ) -> Result<String, ExportError> {
            let destination = key.to_string();
            if self.fail_store_keys.contains(&destination) {
                return Err(ExportError::Store("磁盘空间不足".to_string()));
            }
            self.stored.lock().unwrap().push(destination.clone());
            Ok(destination)
        }

        async fn exists(&mut self, key: &DestinationKey) -> Result<bool, ExportError> {
            if self.fail_exists_check {
                return Err(ExportError::Communication("检查通道断开".to_string()));
            }
            Ok(self.existing.contains(&key.to_string()))
        }
    }

    fn progress_channel() -> (
        broadcast::Sender<ProgressEvent>,
        broadcast::Receiver<ProgressEvent>,
    ) {
        broadcast::channel(256)
    }

    #[tokio::test]
    async fn test_one_result_per_job_in_order() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        let (tx, _rx) = progress_channel();

        let request = request(5);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert_eq!(results.len(), 5);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.title, format!("会话 {}", i + 1));
            assert!(result.success);
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let mut navigator = MockNavigator::default();
        navigator.fail_urls.insert("https://chatgpt.com/c/1".to_string());
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        let (tx, _rx) = progress_channel();

        let request = request(2);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert_eq!(
            results[0].error_kind,
            Some(crate::error::ErrorKind::NavigationTimeout)
        );
        assert!(results[0].error_detail.is_some());
        assert!(results[1].success);
    }

    #[tokio::test]
    async fn test_extraction_error_recorded_per_job() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::with_outcomes(vec![
            Err(ExportError::NoMessagesFound),
            Ok(3),
        ]);
        let mut channel = MockChannel::default();
        let (tx, _rx) = progress_channel();

        let request = request(2);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert!(!results[0].success);
        assert_eq!(
            results[0].error_kind,
            Some(crate::error::ErrorKind::NoMessagesFound)
        );
        assert!(results[1].success);
        assert_eq!(results[1].message_count, Some(3));
    }

    #[tokio::test]
    async fn test_extraction_timeout_is_per_job_failure() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let mut channel = MockChannel::default();
        let (tx, _rx) = progress_channel();

        let request = request(1);
        let opts = RunnerOptions {
            window_size: 4,
            job_timeout: Duration::from_millis(10),
            neutral_url: "about:blank".to_string(),
        };
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, opts, tx);
        let results = runner.run(&request).await;

        assert!(!results[0].success);
        assert_eq!(
            results[0].error_kind,
            Some(crate::error::ErrorKind::ExtractionTimeout)
        );
    }

    #[tokio::test]
    async fn test_window_reset_after_full_windows_only() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        let (tx, _rx) = progress_channel();

        // 窗口大小 4、9 个会话：第 4 个和第 8 个之后各重置一次，
        // 最后一个（不满的）窗口之后不重置
        let request = request(9);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert_eq!(results.len(), 9);
        assert_eq!(*navigator.resets.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_skip_if_exists_invokes_no_extraction() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        channel
            .existing
            .insert("ChatGPT/会话_1.md".to_string());
        let (tx, _rx) = progress_channel();

        let request = request(1);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert!(results[0].success);
        assert!(results[0].message_count.is_none());
        assert_eq!(extractor.call_count(), 0);
        assert!(channel.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_exists_check_proceeds_with_export() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel {
            fail_exists_check: true,
            ..Default::default()
        };
        let (tx, _rx) = progress_channel();

        let request = request(1);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert!(results[0].success);
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_recorded_per_job() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        channel
            .fail_store_keys
            .insert("ChatGPT/会话_1.md".to_string());
        let (tx, _rx) = progress_channel();

        let request = request(2);
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        let results = runner.run(&request).await;

        assert!(!results[0].success);
        assert_eq!(results[0].error_kind, Some(crate::error::ErrorKind::StoreError));
        assert!(results[0].error_detail.is_some());
        // 写盘失败只影响当前会话，后面的继续
        assert!(results[1].success);
        assert_eq!(
            channel.stored.lock().unwrap().as_slice(),
            ["ChatGPT/会话_2.md"]
        );
    }

    #[tokio::test]
    async fn test_progress_events_monotonic() {
        let navigator = MockNavigator::default();
        let extractor = MockExtractor::default();
        let mut channel = MockChannel::default();
        let (tx, mut rx) = progress_channel();

        let request = request(6);
        let total = request.chats.len();
        let mut runner = BatchRunner::new(&navigator, &extractor, &mut channel, options(4), tx);
        runner.run(&request).await;

        let mut last_current = 0;
        let mut seen = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(event.current >= last_current, "进度必须单调不减");
            assert!(event.current >= 1 && event.current <= total);
            assert_eq!(event.total, total);
            last_current = event.current;
            seen += 1;
        }
        assert!(seen > 0);
        assert_eq!(last_current, total);
    }

    #[test]
    fn test_destination_key_by_platform() {
        let key = destination_key(&job(7), FormatKind::Markdown);
        assert_eq!(key.dir_name, "ChatGPT");
        assert_eq!(key.file_name, "会话_7.md");

        let unknown = ChatJob {
            id: "x".to_string(),
            title: "未知平台".to_string(),
            url: "https://example.com/chat".to_string(),
        };
        let key = destination_key(&unknown, FormatKind::Html);
        assert_eq!(key.dir_name, "Other");
        assert_eq!(key.file_name, "未知平台.html");
    }
}
