//! 分块重组缓冲
//!
//! helper 进程侧的接收缓冲：按目标键累积分块，收到 `final`
//! 时按到达顺序拼接并交还调用方落盘。
//!
//! 缓冲生命周期是显式的：某个键的条目在收到第一个分块时创建，
//! 在 `final` 时销毁。对已清空的键再次收到 `final` 按全新的
//! 一次累积处理（幂等安全：永远不崩溃）。

use std::collections::HashMap;

/// 按目标键累积分块的缓冲
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    buffers: HashMap<String, Vec<String>>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接收一个分块
    ///
    /// 非 final 分块被缓存，返回 `None`；
    /// final 分块触发拼接，返回完整内容并清空该键的缓冲
    pub fn push(&mut self, key: &str, data: String, is_final: bool) -> Option<String> {
        if !is_final {
            self.buffers.entry(key.to_string()).or_default().push(data);
            return None;
        }

        let mut parts = self.buffers.remove(key).unwrap_or_default();
        parts.push(data);
        Some(parts.concat())
    }

    /// 丢弃某个键已累积的分块
    ///
    /// 半途失败的传输留下的残块会污染下一次同键写入，必须显式丢弃。
    /// 返回该键是否确实有缓冲
    pub fn discard(&mut self, key: &str) -> bool {
        self.buffers.remove(key).is_some()
    }

    /// 当前正在累积的键数量
    pub fn pending(&self) -> usize {
        self.buffers.len()
    }
}
