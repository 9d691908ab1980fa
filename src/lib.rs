//! # Front Health Check
//!
//! 聊天前台的合成监控探针：像真实用户一样打开页面、提交问题、
//! 等待回答出现，通过进程退出码向外部监控系统报告结果
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Browser）
//! - `browser/` - 持有稀缺资源（Browser / Page），只暴露能力
//! - `BrowserSession` - 唯一的 page owner，提供导航 / 等待 / 输入 / 截图能力
//!
//! ### ② 业务能力层（Detection）
//! - `detector` - 回答检测能力，按优先级尝试多种定位策略
//!
//! ### ③ 流程层（Probe）
//! - `probe` - 定义"一次探测"的完整流程（导航 → 提问 → 等待回答 → 结果）
//!
//! ### ④ 编排层（Scheduler）
//! - `scheduler` - 重试调度，指数退避，产出最终结论

pub mod browser;
pub mod config;
pub mod detector;
pub mod error;
pub mod logger;
pub mod outcome;
pub mod probe;
pub mod scheduler;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::{Config, Credentials};
pub use detector::{AnswerDetector, Locator, ANSWER_STRATEGIES};
pub use error::ProbeError;
pub use outcome::ProbeOutcome;
pub use probe::run_attempt;
pub use scheduler::run_with_retry;
