//! 回答检测 - 业务能力层
//!
//! 判断"回答是否已经出现"。页面上回答区域的 DOM 形态没有保证，
//! 所以按优先级准备多种定位策略，命中任意一种即算成功

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::browser::BrowserSession;

/// 页面元素定位策略
///
/// 检测循环只把它当作不透明描述符，具体如何求值由会话层决定
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locator {
    /// 页面可见文本包含给定片段
    Text(&'static str),
    /// CSS 选择器命中至少一个元素
    Css(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Text(text) => write!(f, "text={}", text),
            Locator::Css(selector) => write!(f, "{}", selector),
        }
    }
}

/// 回答检测策略，按优先级排列
///
/// 1. 回答开头的固定文案
/// 2. 满意度确认文案
/// 3. 语义化测试标记
/// 4. 通用回答容器
pub const ANSWER_STRATEGIES: [Locator; 4] = [
    Locator::Text("AIチャットbotより回答します"),
    Locator::Text("この回答に満足されましたか？"),
    Locator::Css("[data-testid=\"answer\"]"),
    Locator::Css(".answer-content"),
];

/// 回答检测器
///
/// 职责：
/// - 按固定顺序逐个尝试定位策略
/// - 每个策略有独立的超时窗口
/// - 单个策略超时或出错不中断整体检测
/// - 只读等待，不改变页面状态
pub struct AnswerDetector {
    strategies: Vec<Locator>,
    per_strategy_timeout: Duration,
}

impl AnswerDetector {
    pub fn new(strategies: Vec<Locator>, per_strategy_timeout: Duration) -> Self {
        Self {
            strategies,
            per_strategy_timeout,
        }
    }

    /// 在页面上检测回答是否出现
    pub async fn detect(&self, session: &BrowserSession) -> bool {
        let timeout = self.per_strategy_timeout;
        first_match(&self.strategies, |locator| {
            session.wait_for_locator(locator, timeout)
        })
        .await
    }
}

/// 按顺序尝试各策略，第一个命中即返回 true
///
/// `appears` 返回 false 表示该策略超时或出错，继续尝试下一个；
/// 命中后剩余策略不再求值
pub async fn first_match<F, Fut>(strategies: &[Locator], mut appears: F) -> bool
where
    F: FnMut(Locator) -> Fut,
    Fut: Future<Output = bool>,
{
    for locator in strategies {
        debug!("Trying answer locator: {}", locator);
        if appears(*locator).await {
            debug!("Answer locator matched: {}", locator);
            return true;
        }
    }
    false
}
