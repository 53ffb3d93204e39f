//! Controlled Chrome session, one per punch operation.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::chrome_finder::ChromeFinder;
use crate::driver::{DriverError, PortalDriver, StepResult};
use crate::{Error, Result};

/// Polling interval used inside the bounded element waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fixed stability flags, matching what the portal automation needs to run
/// unattended in containers and on lean desktops.
const CHROME_ARGS: [&str; 3] = ["--no-sandbox", "--disable-dev-shm-usage", "--disable-gpu"];

struct SessionInner {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

/// Owns exactly one Chrome process for the duration of one
/// authentication+punch sequence. Sessions are never pooled or reused; each
/// operation gets a fresh browser so no cookies or login state leak between
/// punches.
pub struct BrowserSession {
    inner: Mutex<Option<SessionInner>>,
    page: Page,
}

impl BrowserSession {
    /// Launch a fresh browser and open a blank page. `WEBPUNCH_CHROME`
    /// overrides the binary lookup.
    pub async fn open(headless: bool) -> Result<Self> {
        let custom = std::env::var_os("WEBPUNCH_CHROME").map(std::path::PathBuf::from);
        let chrome = ChromeFinder::new(custom).find()?;
        tracing::debug!("launching Chrome from {}", chrome.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome)
            .window_size(1920, 1080)
            .args(CHROME_ARGS.to_vec());
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Launch(format!("failed to launch Chrome: {}", e)))?;

        // Drain the CDP message stream for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                if let Err(close_err) = browser.close().await {
                    tracing::debug!("browser close after failed page open: {}", close_err);
                }
                handler_task.abort();
                return Err(Error::Cdp(format!("failed to open page: {}", e)));
            }
        };

        tracing::info!("browser session opened (headless: {})", headless);

        Ok(Self {
            inner: Mutex::new(Some(SessionInner {
                browser,
                handler_task,
            })),
            page,
        })
    }

    fn selector(id: &str) -> String {
        format!("[id=\"{}\"]", id)
    }

    async fn find_now(&self, id: &str) -> std::result::Result<Element, DriverError> {
        match self.page.find_element(Self::selector(id)).await {
            Ok(element) => Ok(element),
            Err(e) => {
                tracing::debug!("element '{}' not found: {}", id, e);
                Err(DriverError::NotFound)
            }
        }
    }

    async fn element_enabled(&self, element: &Element) -> bool {
        match element
            .call_js_fn("function() { return !this.disabled; }", false)
            .await
        {
            Ok(ret) => ret
                .result
                .value
                .as_ref()
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
            Err(e) => {
                tracing::debug!("enabled check failed (assuming enabled): {}", e);
                true
            }
        }
    }

    async fn poll_for(&self, id: &str, timeout: Duration, clickable: bool) -> StepResult {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.find_now(id).await {
                if !clickable || self.element_enabled(&element).await {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PortalDriver for BrowserSession {
    async fn goto(&self, url: &str) -> StepResult {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Other(format!("navigation to {} failed: {}", url, e)))
    }

    async fn wait_for(&self, id: &str, timeout: Duration) -> StepResult {
        self.poll_for(id, timeout, false).await
    }

    async fn wait_clickable(&self, id: &str, timeout: Duration) -> StepResult {
        self.poll_for(id, timeout, true).await
    }

    async fn fill(&self, id: &str, value: &str) -> StepResult {
        let element = self.find_now(id).await?;

        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| DriverError::Other(format!("could not clear '{}': {}", id, e)))?;
        element
            .click()
            .await
            .map_err(|e| DriverError::Other(format!("could not focus '{}': {}", id, e)))?;
        element
            .type_str(value)
            .await
            .map_err(|e| DriverError::Other(format!("could not type into '{}': {}", id, e)))?;

        Ok(())
    }

    async fn click(&self, id: &str) -> StepResult {
        let element = self.find_now(id).await?;
        element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Other(format!("could not click '{}': {}", id, e)))
    }

    /// Idempotent teardown; errors are logged and swallowed.
    async fn close(&self) {
        let inner = self.inner.lock().await.take();
        if let Some(mut inner) = inner {
            if let Err(e) = inner.browser.close().await {
                tracing::debug!("browser close failed (ignored): {}", e);
            }
            if let Err(e) = inner.browser.wait().await {
                tracing::debug!("browser wait failed (ignored): {}", e);
            }
            inner.handler_task.abort();
            tracing::info!("browser session closed");
        }
    }
}
