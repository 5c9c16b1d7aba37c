//! 重复采样稳定判定
//!
//! 处理"不知道页面什么时候加载完"这类问题的通用模式：
//! 反复采样某个观测值，连续若干轮不变即认为稳定；
//! 轮数有上限，超限后直接使用最后一次采样结果。

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::debug;

/// 反复采样直到观测值稳定
///
/// # 参数
/// - `sample`: 采样函数（每轮调用一次）
/// - `required_stable`: 连续多少轮与上一轮相同视为稳定；
///   首轮只建立基准值，不算稳定轮
/// - `max_rounds`: 采样轮数上限
/// - `interval`: 每轮之间的等待时间
///
/// # 返回
/// 稳定后（或轮数耗尽后）的最后一次采样值
pub async fn sample_until_stable<T, F, Fut>(
    mut sample: F,
    required_stable: usize,
    max_rounds: usize,
    interval: Duration,
) -> Result<T>
where
    T: PartialEq,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last = sample().await?;
    let mut stable_rounds = 0;

    for round in 2..=max_rounds {
        if stable_rounds >= required_stable {
            break;
        }

        sleep(interval).await;
        let current = sample().await?;

        if current == last {
            stable_rounds += 1;
        } else {
            stable_rounds = 0;
        }
        last = current;

        debug!("采样第 {} 轮，连续稳定 {} 轮", round, stable_rounds);
    }

    Ok(last)
}
