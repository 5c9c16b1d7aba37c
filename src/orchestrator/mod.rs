//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批处理核心循环
//! - 窗口化顺序处理（单页面资源，绝不并发）
//! - 单会话失败隔离、跳过优化、进度广播
//! - 窗口间的页面重置（内存卫生）
//!
//! ### `batch_processor` - 应用装配
//! - 管理应用生命周期（初始化、运行、清理）
//! - 连接浏览器、装配导航器/提取器/持久化通道
//! - 消费进度事件并输出日志
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (装配资源，持有 Browser)
//!     ↓
//! batch_runner (处理 Vec<ChatJob>)
//!     ↓
//! browser::Navigate / extractor::ExtractContent / persistence::PersistenceChannel
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```

pub mod batch_processor;
pub mod batch_runner;

pub use batch_processor::App;
pub use batch_runner::{BatchRunner, RunnerOptions};
