//! 持久化通道
//!
//! 两种可互换的策略在同一个接口后面：
//! - [`WriterChannel`]：走 helper 进程的分块帧协议（主策略）
//! - [`DownloadChannel`]：浏览器直接下载（退化策略）

pub mod assembler;
pub mod codec;
pub mod download;
pub mod protocol;
pub mod writer_client;
pub mod writer_host;

use std::fmt;

pub use assembler::ChunkAssembler;
pub use download::DownloadChannel;
pub use writer_client::WriterChannel;
pub use writer_host::WriterHost;

use crate::error::ExportError;

/// 目标键：目录 + 文件名，唯一标识一个会话的落盘位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationKey {
    pub dir_name: String,
    pub file_name: String,
}

impl DestinationKey {
    pub fn new(dir_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
            file_name: file_name.into(),
        }
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dir_name, self.file_name)
    }
}

/// 持久化能力（编排层的协作者接口）
pub trait PersistenceChannel {
    /// 把最终内容交给持久化存储，成功时返回目标位置描述
    fn store(
        &mut self,
        key: &DestinationKey,
        content: &str,
    ) -> impl std::future::Future<Output = Result<String, ExportError>> + Send;

    /// 检查目标是否已存在（用于跳过已导出的会话）
    ///
    /// 调用方把失败当作"不存在"处理，检查失败绝不阻塞会话
    fn exists(
        &mut self,
        key: &DestinationKey,
    ) -> impl std::future::Future<Output = Result<bool, ExportError>> + Send;
}

/// 运行期选择的持久化策略
pub enum StorageChannel {
    Writer(WriterChannel),
    Download(DownloadChannel),
}

impl StorageChannel {
    /// 批次结束后的清理（只有 helper 进程需要）
    pub async fn shutdown(self) {
        if let StorageChannel::Writer(channel) = self {
            channel.shutdown().await;
        }
    }
}

impl PersistenceChannel for StorageChannel {
    async fn store(&mut self, key: &DestinationKey, content: &str) -> Result<String, ExportError> {
        match self {
            StorageChannel::Writer(channel) => channel.store(key, content).await,
            StorageChannel::Download(channel) => channel.store(key, content).await,
        }
    }

    async fn exists(&mut self, key: &DestinationKey) -> Result<bool, ExportError> {
        match self {
            StorageChannel::Writer(channel) => channel.exists(key).await,
            StorageChannel::Download(channel) => channel.exists(key).await,
        }
    }
}
