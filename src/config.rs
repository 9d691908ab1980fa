//! 探测配置
//!
//! 全部来自环境变量，进程启动时构建一次，运行期间只读

/// Basic 认证凭据
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// 探测配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 被探测站点的基础 URL
    pub base_url: String,
    /// 可选的 Basic 认证凭据（staging 环境需要）
    pub basic_auth: Option<Credentials>,
    /// 聊天机器人标识，作为 ai_name 查询参数附加到 URL
    pub ai_name: String,
    /// 候选问题池，保证非空
    pub questions: Vec<String>,
    /// 单个回答检测策略的等待上限（毫秒）
    pub answer_timeout_ms: u64,
    /// 是否以无头模式运行浏览器
    pub headless: bool,
    /// 最大尝试次数，至少为 1
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://stg.front.geechat.jp".to_string(),
            basic_auth: None,
            ai_name: "sample1".to_string(),
            questions: vec!["質問1".to_string(), "質問2".to_string()],
            answer_timeout_ms: 30_000,
            headless: true,
            max_attempts: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("FRONT_URL").unwrap_or(default.base_url),
            basic_auth: basic_auth_from_env(),
            ai_name: std::env::var("AI_NAME").unwrap_or(default.ai_name),
            questions: std::env::var("QUESTIONS").ok().map(|v| parse_question_list(&v)).filter(|qs| !qs.is_empty()).unwrap_or(default.questions),
            answer_timeout_ms: std::env::var("TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.answer_timeout_ms),
            headless: std::env::var("HEADLESS").ok().and_then(|v| parse_bool(&v)).unwrap_or(default.headless),
            max_attempts: std::env::var("RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_attempts).max(1),
        }
    }
}

/// 两个环境变量都设置且非空时才启用 Basic 认证
fn basic_auth_from_env() -> Option<Credentials> {
    let username = std::env::var("BASIC_AUTH_USER").ok().filter(|v| !v.is_empty())?;
    let password = std::env::var("BASIC_AUTH_PASS").ok().filter(|v| !v.is_empty())?;
    Some(Credentials { username, password })
}

/// 识别常见的布尔字符串形式，无法识别时返回 None
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 逗号分隔的问题列表，条目去除首尾空白，空条目丢弃
fn parse_question_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}
