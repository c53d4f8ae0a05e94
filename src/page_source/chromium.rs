//! chromiumoxide-backed [`PageSource`] implementation.
//!
//! Launches one browser per product session with anti-automation arguments,
//! keeps the CDP event handler on a tracked task, and tears both down in
//! order on close. The handler MUST be aborted after the browser is closed
//! or it runs indefinitely against a dead connection.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{info, trace, warn};

use super::{PageSource, SessionFactory};

/// Per-operation CDP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One live Chromium session bound to a single page.
pub struct ChromiumPage {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
}

impl PageSource for ChromiumPage {
    type Handle = Element;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        info!("Navigating to {url}");
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.page
            .wait_for_navigation()
            .await
            .context("Failed to wait for page load")?;
        Ok(())
    }

    async fn current_url(&self) -> String {
        match self.page.url().await {
            Ok(Some(url)) => url,
            Ok(None) => {
                trace!("Page URL is None (page not yet navigated)");
                "about:blank".to_string()
            }
            Err(e) => {
                trace!("Failed to get page URL: {e}");
                "about:blank".to_string()
            }
        }
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements),
            // chromiumoxide reports "no matches" as an error; the pipeline
            // treats an empty set as the non-fatal signal.
            Err(e) => {
                trace!("find_elements('{selector}') matched nothing: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn find_in(&self, handle: &Element, selector: &str) -> Result<Vec<Element>> {
        match handle.find_elements(selector).await {
            Ok(elements) => Ok(elements),
            Err(e) => {
                trace!("scoped find_elements('{selector}') matched nothing: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn text(&self, handle: &Element) -> Result<String> {
        let text = handle
            .inner_text()
            .await
            .context("Failed to read element text")?
            .unwrap_or_default();
        Ok(text)
    }

    async fn scroll_into_view(&self, handle: &Element) -> Result<()> {
        handle
            .scroll_into_view()
            .await
            .context("Failed to scroll element into view")?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .context("Failed to scroll to document bottom")?;
        Ok(())
    }

    async fn document_height(&self) -> Result<i64> {
        let result = self
            .page
            .evaluate("document.body.scrollHeight")
            .await
            .context("Failed to read document height")?;
        result
            .into_value::<i64>()
            .context("Document height was not a number")
    }

    async fn click(&self, handle: &Element) -> Result<()> {
        match handle.click().await {
            Ok(_) => Ok(()),
            Err(e) => {
                // Overlays intercept direct clicks on Flipkart; a script
                // click bypasses hit testing.
                warn!("Direct click intercepted ({e}), falling back to script click");
                handle
                    .call_js_fn("function() { this.click(); }", false)
                    .await
                    .context("Script click fallback failed")?;
                Ok(())
            }
        }
    }

    async fn run_script(&self, js: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(js)
            .await
            .with_context(|| format!("Script evaluation failed: {js}"))?;
        Ok(result.into_value::<Value>().unwrap_or(Value::Null))
    }

    async fn close(mut self) -> Result<()> {
        info!("Closing browser session");
        // Close the browser first, then abort the handler; reversing the
        // order drops the CDP connection out from under the close call.
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Browser wait failed: {e}");
        }
        self.handler.abort();
        if let Err(e) = (&mut self.handler).await
            && !e.is_cancelled()
        {
            warn!("Handler task failed during abort: {e}");
        }
        Ok(())
    }
}

/// Launches a fresh Chromium session per product.
#[derive(Debug, Clone)]
pub struct ChromiumFactory {
    headless: bool,
}

impl Default for ChromiumFactory {
    fn default() -> Self {
        Self { headless: true }
    }
}

impl ChromiumFactory {
    #[must_use]
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }
}

impl SessionFactory for ChromiumFactory {
    type Session = ChromiumPage;

    async fn open(&self, url: &str) -> Result<ChromiumPage> {
        let mut config = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .window_size(1920, 1080)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--disable-popup-blocking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--start-maximized")
            .arg("--mute-audio");
        if self.headless {
            config = config.headless_mode(HeadlessMode::default());
        } else {
            config = config.with_head();
        }
        let config = config
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        info!("Launching browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("Browser handler error: {e:?}");
                }
            }
            info!("Browser event handler task completed");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create page")?;

        let mut session = ChromiumPage {
            browser,
            handler: handler_task,
            page,
        };
        session.navigate(url).await?;
        Ok(session)
    }
}
