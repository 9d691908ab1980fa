//! 浏览器会话 - 基础设施层
//!
//! 持有唯一的 Browser / Page 资源，只暴露探测流程需要的能力：
//! 导航、等待元素、输入、点击、截图。不认识问题池和策略优先级

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, Headers, SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use regex::Regex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::Config;
use crate::detector::Locator;

/// 元素出现的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 浏览器会话
///
/// 一次探测尝试独占一个会话，返回前必须通过 [`BrowserSession::close`]
/// 释放，避免 Chrome 进程在重试之间泄漏
pub struct BrowserSession {
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    /// 启动浏览器并打开空白页面
    ///
    /// 配置了 Basic 认证时通过 CDP 注入 Authorization 头，
    /// 使后续所有请求携带凭据
    pub async fn launch(config: &Config) -> Result<Self> {
        debug!("Launching browser (headless: {})", config.headless);

        let mut builder = BrowserConfig::builder().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ]);
        builder = if config.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("browser config build failed: {}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| anyhow::anyhow!("browser launch failed: {}", e))?;

        // 在后台处理 CDP 事件
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow::anyhow!("page creation failed: {}", e))?;

        let session = Self { browser, page };
        if let Some(auth) = &config.basic_auth {
            session.set_basic_auth(&auth.username, &auth.password).await?;
        }
        Ok(session)
    }

    /// 注入 Basic 认证头
    async fn set_basic_auth(&self, username: &str, password: &str) -> Result<()> {
        let token = BASE64.encode(format!("{}:{}", username, password));
        self.page.execute(EnableParams::default()).await?;
        let headers = Headers::new(serde_json::json!({
            "Authorization": format!("Basic {}", token),
        }));
        self.page
            .execute(SetExtraHttpHeadersParams::new(headers))
            .await?;
        debug!("Basic auth header set for user: {}", username);
        Ok(())
    }

    /// 导航到目标 URL 并等待网络空闲
    ///
    /// goto 失败视为导航失败；后续的安定等待只记录日志，
    /// 页面是否可用交给输入框等待去判定
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        if let Err(e) = self.page.wait_for_navigation().await {
            debug!("Navigation settle wait failed for {}: {}", url, e);
        }
        Ok(())
    }

    /// 等待定位策略在页面上出现
    ///
    /// 在超时窗口内以固定间隔轮询；超时和求值出错都视为未出现
    pub async fn wait_for_locator(&self, locator: Locator, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.locator_present(locator).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    debug!("Locator check failed for {}: {}", locator, e);
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 检查定位策略当前是否命中
    async fn locator_present(&self, locator: Locator) -> Result<bool> {
        let js = match locator {
            Locator::Css(selector) => format!(
                "document.querySelector({}) !== null",
                serde_json::to_string(selector)?
            ),
            Locator::Text(text) => format!(
                "document.body ? document.body.innerText.includes({}) : false",
                serde_json::to_string(text)?
            ),
        };
        let present = self.page.evaluate(js).await?.into_value::<bool>()?;
        Ok(present)
    }

    /// 向匹配选择器的第一个元素输入文本
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow::anyhow!("input element {} not found: {}", selector, e))?;
        // 先点击获取焦点再输入
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// 点击可访问名称匹配正则的第一个按钮
    ///
    /// 依次检查元素的可见文本和 value 属性（input 型按钮的标签）。
    /// 返回是否点击成功
    pub async fn click_by_label(&self, roles_selector: &str, label: &Regex) -> Result<bool> {
        let elements = self
            .page
            .find_elements(roles_selector)
            .await
            .unwrap_or_default();
        for element in elements {
            let text = element.inner_text().await.ok().flatten().unwrap_or_default();
            if label.is_match(&text) {
                element.click().await?;
                return Ok(true);
            }
            if let Ok(Some(value)) = element.attribute("value").await {
                if label.is_match(&value) {
                    element.click().await?;
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// 截取整页 PNG 并写入文件
    pub async fn save_screenshot(&self, path: &Path) -> Result<()> {
        let data = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    /// 关闭浏览器，释放会话资源
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
    }
}
