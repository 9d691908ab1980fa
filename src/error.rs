//! 探测错误类型
//!
//! 一次探测尝试中可能出现的致命错误。每个变体对应流程中
//! 一个可失败的步骤，Display 文本会原样写入结果记录的
//! error_message 字段

use thiserror::Error;

/// 探测尝试的致命错误
#[derive(Debug, Error)]
pub enum ProbeError {
    /// 页面导航失败
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// 在限定时间内未等到问题输入框
    #[error("question input not found within {timeout_ms}ms: {selector}")]
    InputNotFound { selector: String, timeout_ms: u64 },

    /// 未找到可点击的提交按钮
    #[error("submit button matching /{pattern}/ not found")]
    SubmitNotFound { pattern: String },

    /// 所有回答检测策略都未命中
    #[error("回答が表示されませんでした")]
    NoAnswer,
}
