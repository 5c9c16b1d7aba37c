//! 日志初始化
//!
//! 基于 tracing-subscriber，默认 info 级别，可通过 RUST_LOG 覆盖

use tracing_subscriber::EnvFilter;

/// 初始化主程序日志（输出到 stdout）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 初始化 helper 进程日志
///
/// helper 进程的 stdout 是协议通道，日志只能走 stderr
pub fn init_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
