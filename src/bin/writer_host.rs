//! 文件写入 helper 进程
//!
//! stdin/stdout 是帧协议通道，日志只走 stderr。
//! 第一个参数是输出根目录，缺省为 exports

use std::path::PathBuf;

use anyhow::Result;
use export_chat_history::logger;
use export_chat_history::WriterHost;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_stderr();

    let base_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "exports".to_string());

    let host = WriterHost::new(PathBuf::from(base_dir));
    host.run(tokio::io::stdin(), tokio::io::stdout()).await
}
