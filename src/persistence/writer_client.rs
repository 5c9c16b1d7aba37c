//! helper 进程客户端
//!
//! 启动 helper 子进程并通过其 stdio 走帧协议。
//! 超过单条消息上限的内容先切块，按序发送，最后一块标记 `final`。

use std::process::Stdio;

use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

use crate::error::ExportError;
use crate::persistence::codec::{read_frame, write_frame, write_terminal_frame};
use crate::persistence::protocol::{WriterRequest, WriterResponse};
use crate::persistence::DestinationKey;

/// 通过 helper 进程写盘的持久化通道
pub struct WriterChannel {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    chunk_size: usize,
}

impl WriterChannel {
    /// 启动 helper 进程
    ///
    /// `command` 是可执行文件路径（可带参数），输出根目录作为最后一个参数传入
    pub fn spawn(command: &str, output_dir: &str, chunk_size: usize) -> Result<Self, ExportError> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ExportError::Communication("helper 命令为空".to_string()))?;

        let mut child = Command::new(program)
            .args(parts)
            .arg(output_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ExportError::Communication(format!("启动 helper 进程失败: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::Communication("无法获取 helper 进程的 stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExportError::Communication("无法获取 helper 进程的 stdout".to_string()))?;

        info!("✓ helper 进程已启动: {}", command);

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            chunk_size: chunk_size.max(1),
        })
    }

    /// 发送一个请求并等待响应
    async fn request(&mut self, request: &WriterRequest) -> Result<WriterResponse, ExportError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ExportError::Communication(format!("序列化请求失败: {}", e)))?;

        write_frame(&mut self.stdin, &payload)
            .await
            .map_err(|e| ExportError::Communication(format!("发送请求失败: {}", e)))?;

        let frame = read_frame(&mut self.stdout)
            .await
            .map_err(|e| ExportError::Communication(format!("读取响应失败: {}", e)))?
            .ok_or_else(|| ExportError::Communication("helper 进程关闭了通道".to_string()))?;

        serde_json::from_slice(&frame)
            .map_err(|e| ExportError::Communication(format!("解析响应失败: {}", e)))
    }

    /// 存储内容
    ///
    /// 小于分块上限时走单条 `write`；否则切块按序发送
    pub async fn store(
        &mut self,
        key: &DestinationKey,
        content: &str,
    ) -> Result<String, ExportError> {
        if content.len() <= self.chunk_size {
            let response = self
                .request(&WriterRequest::Write {
                    dir_name: key.dir_name.clone(),
                    file_name: key.file_name.clone(),
                    content: content.to_string(),
                })
                .await?;
            return expect_written(response);
        }

        let chunks = split_into_chunks(content, self.chunk_size);
        let last = chunks.len() - 1;
        debug!("内容超过分块上限，切为 {} 块", chunks.len());

        let mut final_response = None;
        for (i, chunk) in chunks.into_iter().enumerate() {
            let response = match self
                .request(&WriterRequest::WriteChunk {
                    dir_name: key.dir_name.clone(),
                    file_name: key.file_name.clone(),
                    data: chunk.to_string(),
                    is_final: i == last,
                    abort: false,
                })
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    self.discard_partial(key).await;
                    return Err(e);
                }
            };

            if !response.success {
                self.discard_partial(key).await;
                return Err(ExportError::Store(
                    response.error.unwrap_or_else(|| "分块传输被拒绝".to_string()),
                ));
            }
            final_response = Some(response);
        }

        expect_written(final_response.unwrap_or_default())
    }

    /// 半途失败后让 helper 丢弃该键已累积的分块，
    /// 避免残块混进下一次同名文件的写入。尽力而为，失败只记日志
    async fn discard_partial(&mut self, key: &DestinationKey) {
        let request = WriterRequest::WriteChunk {
            dir_name: key.dir_name.clone(),
            file_name: key.file_name.clone(),
            data: String::new(),
            is_final: false,
            abort: true,
        };
        if self.request(&request).await.is_err() {
            debug!("丢弃分块请求失败，helper 进程可能已退出");
        }
    }

    /// 存在性检查
    pub async fn exists(&mut self, key: &DestinationKey) -> Result<bool, ExportError> {
        let response = self
            .request(&WriterRequest::CheckExists {
                dir_name: key.dir_name.clone(),
                file_name: key.file_name.clone(),
            })
            .await?;

        Ok(response.exists.unwrap_or(false))
    }

    /// 发送终止帧并等待 helper 进程退出
    pub async fn shutdown(mut self) {
        if write_terminal_frame(&mut self.stdin).await.is_err() {
            debug!("发送终止帧失败，helper 进程可能已退出");
        }
        drop(self.stdin);
        let _ = self.child.wait().await;
    }
}

fn expect_written(response: WriterResponse) -> Result<String, ExportError> {
    if !response.success {
        return Err(ExportError::Store(
            response.error.unwrap_or_else(|| "写入失败".to_string()),
        ));
    }
    response
        .path
        .ok_or_else(|| ExportError::Store("响应中没有文件路径".to_string()))
}

/// 把内容切成不超过 `max_bytes` 的块（保持 UTF-8 字符边界）
///
/// 空内容产出一个空块，保证 K >= 1
pub fn split_into_chunks(content: &str, max_bytes: usize) -> Vec<&str> {
    if content.is_empty() {
        return vec![""];
    }

    let mut chunks = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        if rest.len() <= max_bytes {
            chunks.push(rest);
            break;
        }

        let mut end = max_bytes;
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // 上限比单个字符还小，至少推进一个字符
            end = rest
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
        }

        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}
