//! 探测流程 - 流程层
//!
//! 一次完整的健康检查尝试：打开页面 → 提交问题 → 等待回答。
//! 无论结果如何都会在返回前释放浏览器会话

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use regex::Regex;
use tracing::{error, info};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::detector::{AnswerDetector, Locator, ANSWER_STRATEGIES};
use crate::error::ProbeError;
use crate::outcome::ProbeOutcome;

/// 问题输入框选择器，兼容 input / textarea 两种控件形态
pub const INPUT_SELECTOR: &str =
    r#"input[placeholder*="質問"], textarea[placeholder*="質問"], input[type="text"]"#;

/// 具有按钮角色的元素
const SUBMIT_ROLES_SELECTOR: &str = r#"button, [role="button"], input[type="submit"]"#;

/// 提交按钮的可访问名称
const SUBMIT_LABEL: &str = "送信";

/// 输入框就绪的固定等待上限，与回答超时无关，不可配置
pub const INPUT_READY_TIMEOUT: Duration = Duration::from_millis(10_000);

/// 失败截图目录
const SCREENSHOT_DIR: &str = "screenshots";

/// 执行一次完整的探测尝试
///
/// 任何失败都会被就地收敛成失败结果，不向外抛出。失败时
/// 尽力保存截图，截图自身的错误不会顶替原始失败原因
pub async fn run_attempt(config: &Config) -> ProbeOutcome {
    let started_at = Utc::now();
    let url = probe_url(config);
    info!("🚀 Starting health check: {}", url);

    let session = match BrowserSession::launch(config).await {
        Ok(session) => session,
        Err(e) => {
            let message = e.to_string();
            error!("❌ Health check failed: {}", message);
            return ProbeOutcome::failed(started_at, url, message, None);
        }
    };

    let outcome = match attempt_steps(&session, config, &url).await {
        Ok(question) => {
            info!("✅ Health check passed - Question: \"{}\"", question);
            ProbeOutcome::passed(question, started_at, url)
        }
        Err(e) => {
            let message = e.to_string();
            error!("❌ Health check failed: {}", message);
            let diagnostics = capture_failure_screenshot(&session).await;
            ProbeOutcome::failed(started_at, url, message, diagnostics)
        }
    };

    session.close().await;
    outcome
}

/// 探测的主要步骤，成功时返回提交的问题
async fn attempt_steps(session: &BrowserSession, config: &Config, url: &str) -> Result<String> {
    session.navigate(url).await.map_err(|e| ProbeError::Navigation {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let question = pick_question(&config.questions);
    info!("📝 Sending question: \"{}\"", question);

    if !session
        .wait_for_locator(Locator::Css(INPUT_SELECTOR), INPUT_READY_TIMEOUT)
        .await
    {
        return Err(ProbeError::InputNotFound {
            selector: INPUT_SELECTOR.to_string(),
            timeout_ms: INPUT_READY_TIMEOUT.as_millis() as u64,
        }
        .into());
    }

    session.fill(INPUT_SELECTOR, &question).await?;

    let label = Regex::new(SUBMIT_LABEL)?;
    if !session.click_by_label(SUBMIT_ROLES_SELECTOR, &label).await? {
        return Err(ProbeError::SubmitNotFound {
            pattern: SUBMIT_LABEL.to_string(),
        }
        .into());
    }

    let detector = AnswerDetector::new(
        ANSWER_STRATEGIES.to_vec(),
        Duration::from_millis(config.answer_timeout_ms),
    );
    if !detector.detect(session).await {
        return Err(ProbeError::NoAnswer.into());
    }

    Ok(question)
}

/// 保存失败现场的整页截图（尽力而为）
async fn capture_failure_screenshot(session: &BrowserSession) -> Option<String> {
    let dir = Path::new(SCREENSHOT_DIR);
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        error!("Failed to save screenshot: {}", e);
        return None;
    }
    let path = dir.join(diagnostics_filename(Utc::now()));
    match session.save_screenshot(&path).await {
        Ok(()) => {
            info!("📸 Screenshot saved: {}", path.display());
            Some(path.to_string_lossy().into_owned())
        }
        Err(e) => {
            error!("Failed to save screenshot: {}", e);
            None
        }
    }
}

// ========== 纯函数部分 ==========

/// 探测目标 URL，ai_name 作为查询参数
pub fn probe_url(config: &Config) -> String {
    format!("{}?ai_name={}", config.base_url, config.ai_name)
}

/// 从问题池中均匀随机抽取一个问题
///
/// 问题池由配置层保证非空
pub fn pick_question(questions: &[String]) -> String {
    let index = rand::thread_rng().gen_range(0..questions.len());
    questions[index].clone()
}

/// 截图文件名，时间戳中的 `:` 和 `.` 替换为 `-` 保证跨平台可用
fn diagnostics_filename(at: DateTime<Utc>) -> String {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let sanitized: String = stamp
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    format!("error-{}.png", sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_probe_url_appends_ai_name() {
        let config = Config::default();
        assert_eq!(
            probe_url(&config),
            "https://stg.front.geechat.jp?ai_name=sample1"
        );
    }

    #[test]
    fn test_pick_question_always_draws_from_pool() {
        let pool = vec![
            "質問1".to_string(),
            "質問2".to_string(),
            "質問3".to_string(),
        ];
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let question = pick_question(&pool);
            assert!(pool.contains(&question));
            seen.insert(question);
        }
        // 1000 次抽取后每个问题都应该出现过
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_pick_question_single_element_pool() {
        let pool = vec!["質問1".to_string()];
        for _ in 0..100 {
            assert_eq!(pick_question(&pool), "質問1");
        }
    }

    #[test]
    fn test_diagnostics_filename_is_filesystem_safe() {
        let at: DateTime<Utc> = "2026-08-26T12:34:56.789Z".parse().unwrap();
        let name = diagnostics_filename(at);
        assert_eq!(name, "error-2026-08-26T12-34-56-789Z.png");
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_input_ready_timeout_is_fixed() {
        // 输入框等待独立于 answer_timeout_ms
        assert_eq!(INPUT_READY_TIMEOUT, Duration::from_millis(10_000));
    }
}
