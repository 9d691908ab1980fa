//! 浏览器基础设施

mod session;

pub use session::BrowserSession;
