//! 重试调度 - 编排层
//!
//! 把单次尝试的抖动收敛成一个整体结论：最多尝试 max_attempts 次，
//! 首次成功即停，重试之间指数退避，避免对目标站点造成冲击

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::outcome::ProbeOutcome;
use crate::probe;

/// 退避时长上限
const MAX_BACKOFF: Duration = Duration::from_millis(10_000);

/// 第 `attempt` 次尝试（1 起）之前的退避时长
///
/// 1000ms 起步逐次翻倍，上限 10 秒；首次尝试之前不会被调用
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(2).min(10);
    Duration::from_millis(1000u64 << exponent).min(MAX_BACKOFF)
}

/// 带重试地执行探测尝试
///
/// `attempt` 每次被调用时收到 1 起的尝试序号。第一次成功立即
/// 返回；尝试次数用尽时返回最后一次的结果，不合并历史结果
pub async fn run_with_retry<F, Fut>(max_attempts: u32, mut attempt: F) -> ProbeOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ProbeOutcome>,
{
    let total = max_attempts.max(1);
    let mut current = 1;
    loop {
        let outcome = attempt(current).await;
        if outcome.success || current >= total {
            return outcome;
        }
        current += 1;
        let delay = backoff_delay(current);
        info!(
            "🔁 Retry attempt {}/{} (wait {}ms)",
            current,
            total,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
    }
}

/// 按配置执行完整的健康检查（含重试）
pub async fn run(config: &Config) -> ProbeOutcome {
    run_with_retry(config.max_attempts, |_| probe::run_attempt(config)).await
}
