//! 探测结果记录

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 一次探测尝试（或整次运行）的结果
///
/// 构造后不再修改；字段约束由两个构造函数保证：
/// 成功时不带错误信息和截图路径，失败时必带错误信息
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    /// 是否观察到回答
    pub success: bool,
    /// 实际提交的问题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// 尝试开始时间
    pub started_at: DateTime<Utc>,
    /// 尝试结束时间
    pub ended_at: DateTime<Utc>,
    /// 探测的完整 URL
    pub url: String,
    /// 失败原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// 失败截图的保存路径（截图成功时才有）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics_path: Option<String>,
}

impl ProbeOutcome {
    /// 成功结果
    pub fn passed(question: String, started_at: DateTime<Utc>, url: String) -> Self {
        Self {
            success: true,
            question: Some(question),
            started_at,
            ended_at: Utc::now(),
            url,
            error_message: None,
            diagnostics_path: None,
        }
    }

    /// 失败结果
    pub fn failed(
        started_at: DateTime<Utc>,
        url: String,
        error_message: String,
        diagnostics_path: Option<String>,
    ) -> Self {
        Self {
            success: false,
            question: None,
            started_at,
            ended_at: Utc::now(),
            url,
            error_message: Some(error_message),
            diagnostics_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_outcome_has_no_error_fields() {
        let outcome = ProbeOutcome::passed(
            "質問1".to_string(),
            Utc::now(),
            "https://stg.front.geechat.jp?ai_name=sample1".to_string(),
        );
        assert!(outcome.success);
        assert_eq!(outcome.question.as_deref(), Some("質問1"));
        assert!(outcome.error_message.is_none());
        assert!(outcome.diagnostics_path.is_none());
        assert!(outcome.ended_at >= outcome.started_at);
    }

    #[test]
    fn test_failed_outcome_carries_error_message() {
        let outcome = ProbeOutcome::failed(
            Utc::now(),
            "https://stg.front.geechat.jp?ai_name=sample1".to_string(),
            "回答が表示されませんでした".to_string(),
            None,
        );
        assert!(!outcome.success);
        assert!(outcome.question.is_none());
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("回答が表示されませんでした")
        );
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent_fields() {
        let outcome = ProbeOutcome::passed(
            "質問2".to_string(),
            Utc::now(),
            "https://example.com".to_string(),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["question"], "質問2");
        assert!(json.get("startedAt").is_some());
        assert!(json.get("endedAt").is_some());
        assert!(json.get("errorMessage").is_none());
        assert!(json.get("diagnosticsPath").is_none());
    }

    #[test]
    fn test_failed_outcome_serializes_diagnostics_path() {
        let outcome = ProbeOutcome::failed(
            Utc::now(),
            "https://example.com".to_string(),
            "boom".to_string(),
            Some("screenshots/error-2026-08-26T12-34-56-789Z.png".to_string()),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["errorMessage"], "boom");
        assert_eq!(
            json["diagnosticsPath"],
            "screenshots/error-2026-08-26T12-34-56-789Z.png"
        );
        assert!(json.get("question").is_none());
    }
}
