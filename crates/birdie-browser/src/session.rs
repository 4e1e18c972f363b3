use crate::chrome::ChromeProcess;
use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::ReloadParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);
const SETTLE_DELAY: Duration = Duration::from_millis(500);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One Chrome process plus its CDP connection and the page the booking
/// flows drive. The sole I/O boundary to the reservation site.
pub struct Session {
    chrome: ChromeProcess,
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Session {
    /// Connect to a launched Chrome over CDP and take over its first page.
    ///
    /// Chrome is not ready to accept connections the instant the process
    /// starts, so connecting retries a few times before giving up.
    pub async fn attach(mut chrome: ChromeProcess) -> Result<Self> {
        let url = format!("http://localhost:{}", chrome.debugging_port());

        let connected = {
            let mut retries = CONNECT_ATTEMPTS;
            loop {
                tracing::debug!("connecting to Chrome at {}", url);
                match Browser::connect(&url).await {
                    Ok(connected) => break Ok(connected),
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            break Err(Error::Cdp(format!(
                                "failed to connect to Chrome after {} attempts: {}",
                                CONNECT_ATTEMPTS, e
                            )));
                        }
                        tracing::debug!("connect failed, retrying ({} left): {}", retries, e);
                        sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        };
        let (browser, mut handler) = match connected {
            Ok(pair) => pair,
            Err(e) => {
                chrome.kill();
                return Err(e);
            }
        };

        // The handler stream must be polled for any browser command to
        // resolve.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error: {}", e);
                }
            }
        });

        // Chrome creates its initial page shortly after startup.
        sleep(SETTLE_DELAY).await;
        let page = match Self::first_page(&browser).await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                chrome.kill();
                return Err(e);
            }
        };

        tracing::info!("CDP session established on port {}", chrome.debugging_port());
        Ok(Self {
            chrome,
            browser,
            page,
            handler_task,
        })
    }

    async fn first_page(browser: &Browser) -> Result<Page> {
        match browser.pages().await?.into_iter().next() {
            Some(page) => Ok(page),
            None => Ok(browser.new_page("about:blank").await?),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("navigating to {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Wait until the document reports `readyState == "complete"`, then let
    /// the page settle briefly. The booking widget keeps rendering after
    /// readyState flips, so the settle pause stays.
    pub async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self
                .page
                .evaluate("document.readyState")
                .await?
                .value()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();

            if state == "complete" {
                sleep(SETTLE_DELAY).await;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::PageNotReady(format!(
                    "readyState was '{}' after {:?}",
                    state, timeout
                )));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    pub async fn reload(&self) -> Result<()> {
        tracing::debug!("reloading page");
        self.page.execute(ReloadParams::default()).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Capture the page into `<dir>/<label>.png`, returning the path.
    pub async fn screenshot(&self, dir: &Path, label: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{}.png", label));
        self.page
            .save_screenshot(ScreenshotParams::builder().build(), &path)
            .await?;
        tracing::debug!("screenshot saved to {}", path.display());
        Ok(path)
    }

    /// Tear the session down: close the CDP connection, kill Chrome, stop
    /// the handler task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {}", e);
        }
        self.chrome.kill();
        self.handler_task.abort();
    }
}
