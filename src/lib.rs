//! # Export Chat History
//!
//! 批量导出聊天网页会话记录的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//!
//! ### ② 能力层（Collaborators）
//! - `browser/` - 浏览器连接与导航控制（静默窗口就绪启发）
//! - `extractor/` - 按平台提取 (speaker, text) 消息列表
//! - `formatter/` - 渲染为 markdown / html / plaintext
//! - `persistence/` - 持久化通道（helper 进程分块协议 / 浏览器下载）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批处理核心循环：窗口化、失败隔离、
//!   跳过优化、进度广播
//! - `orchestrator/batch_processor` - 应用装配与全局统计
//!
//! ## 设计原则
//!
//! 1. **单一共享资源**：页面上下文由编排层独占，会话严格串行
//! 2. **失败隔离**：单个会话的失败绝不中断批次
//! 3. **协作者接口**：提取/格式化/持久化都隐藏在 trait 后面
//! 4. **即发即弃进度**：监听者丢失不影响批处理

pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod persistence;
pub mod utils;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, Navigate, PageNavigator};
pub use config::Config;
pub use error::{ErrorKind, ExportError};
pub use extractor::{ExtractContent, MessageExtractor};
pub use infrastructure::JsExecutor;
pub use models::{BatchRequest, ChatJob, ChatMessage, FormatKind, JobResult, ProgressEvent};
pub use orchestrator::{App, BatchRunner, RunnerOptions};
pub use persistence::{DestinationKey, PersistenceChannel, StorageChannel, WriterHost};
