//! helper 进程侧的接收循环
//!
//! 从字节流读请求帧、执行写盘/检查，把响应帧写回去。
//! 目录按需递归创建；写入直接覆盖同名文件（没有备份语义）。
//! 单个请求的失败只产生失败响应，循环本身不退出。

use std::path::PathBuf;

use anyhow::Result;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::persistence::assembler::ChunkAssembler;
use crate::persistence::codec::{read_frame, write_frame};
use crate::persistence::protocol::{WriterRequest, WriterResponse};

/// 文件写入宿主
pub struct WriterHost {
    base_dir: PathBuf,
    assembler: ChunkAssembler,
}

impl WriterHost {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            assembler: ChunkAssembler::new(),
        }
    }

    /// 接收循环：跑到对端关闭或收到零长度帧为止
    pub async fn run<R, W>(mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("📂 写入宿主启动，根目录: {}", self.base_dir.display());

        while let Some(frame) = read_frame(&mut reader).await? {
            let response = match serde_json::from_slice::<WriterRequest>(&frame) {
                Ok(request) => self.handle(request).await,
                Err(e) => {
                    warn!("无法解析请求: {}", e);
                    WriterResponse::failure(format!("无法解析请求: {}", e))
                }
            };

            let payload = serde_json::to_vec(&response)?;
            write_frame(&mut writer, &payload).await?;
        }

        info!("通道关闭，写入宿主退出");
        Ok(())
    }

    async fn handle(&mut self, request: WriterRequest) -> WriterResponse {
        match request {
            WriterRequest::Write {
                dir_name,
                file_name,
                content,
            } => match self.write_file(&dir_name, &file_name, &content).await {
                Ok(path) => {
                    info!("✓ 已写入: {}", path);
                    WriterResponse::written(path)
                }
                Err(e) => {
                    warn!("写入失败 {}/{}: {}", dir_name, file_name, e);
                    WriterResponse::failure(e.to_string())
                }
            },
            WriterRequest::WriteChunk {
                dir_name,
                file_name,
                data,
                is_final,
                abort,
            } => {
                let key = format!("{}/{}", dir_name, file_name);
                if abort {
                    self.assembler.discard(&key);
                    debug!("已丢弃半途分块: {}", key);
                    return WriterResponse::chunk_discarded();
                }
                match self.assembler.push(&key, data, is_final) {
                    None => {
                        debug!("收到分块: {}", key);
                        WriterResponse::chunk_received()
                    }
                    Some(full_content) => {
                        match self.write_file(&dir_name, &file_name, &full_content).await {
                            Ok(path) => {
                                info!("✓ 分块拼接完成并写入: {}", path);
                                WriterResponse::written(path)
                            }
                            Err(e) => {
                                warn!("分块写入失败 {}: {}", key, e);
                                WriterResponse::failure(e.to_string())
                            }
                        }
                    }
                }
            }
            WriterRequest::CheckExists {
                dir_name,
                file_name,
            } => {
                let path = self.base_dir.join(&dir_name).join(&file_name);
                let exists = fs::try_exists(&path).await.unwrap_or(false);
                debug!("存在性检查 {}: {}", path.display(), exists);
                WriterResponse::existence(exists)
            }
        }
    }

    async fn write_file(&self, dir_name: &str, file_name: &str, content: &str) -> Result<String> {
        let dir = self.base_dir.join(dir_name);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(file_name);
        fs::write(&path, content).await?;
        Ok(path.to_string_lossy().to_string())
    }
}
