use async_trait::async_trait;
use chromiumoxide::{
    Page,
    browser::{Browser, BrowserConfig},
    cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams},
};
use futures::StreamExt;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::acquirer::{
    USER_AGENT,
    errors::AcquireError,
    rendered::{BrowserLauncher, BrowserSession},
};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches headless Chromium with a throwaway profile directory per
/// session, keeping the browser sandbox enabled.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn config(&self, profile_dir: &Path) -> Result<BrowserConfig, AcquireError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", USER_AGENT));

        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(AcquireError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, AcquireError> {
        let profile_dir = std::env::temp_dir().join(format!("harvester-{}", Uuid::new_v4()));
        let config = self.config(&profile_dir)?;

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(err) => {
                let _ = tokio::fs::remove_dir_all(&profile_dir).await;
                return Err(AcquireError::Launch(err.to_string()));
            }
        };

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!(profile = %profile_dir.display(), "browser launched");

        Ok(Box::new(ChromiumSession {
            browser,
            page: None,
            handler_task,
            profile_dir,
            closed: false,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    closed: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, AcquireError> {
        self.page
            .as_ref()
            .ok_or_else(|| AcquireError::Browser("no page is open".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    /// Resolves on `DOMContentLoaded`; images, fonts and frames may still be
    /// loading.
    async fn navigate(&mut self, url: &str) -> Result<(), AcquireError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(AcquireError::from_browser_error)?;
        self.page = Some(page);
        let page = self.page()?;

        // Subscribe before navigating so the event cannot be missed.
        let mut dom_ready = page
            .event_listener::<EventDomContentEventFired>()
            .await
            .map_err(AcquireError::from_browser_error)?;

        let navigated = page
            .execute(NavigateParams::new(url))
            .await
            .map_err(AcquireError::from_browser_error)?;
        if let Some(error_text) = navigated.result.error_text.as_ref() {
            return Err(AcquireError::Browser(error_text.clone()));
        }

        match dom_ready.next().await {
            Some(_) => Ok(()),
            None => Err(AcquireError::Browser(
                "page closed before DOMContentLoaded".to_string(),
            )),
        }
    }

    async fn wait_for_selector(&mut self, selector: &str) -> Result<(), AcquireError> {
        let page = self.page()?;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String, AcquireError> {
        self.page()?
            .content()
            .await
            .map_err(AcquireError::from_browser_error)
    }

    async fn close(&mut self) -> Result<(), AcquireError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.page = None;

        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(AcquireError::from_browser_error);

        if closed.is_err() {
            if let Some(Err(err)) = self.browser.kill().await {
                warn!(error = %err, "failed to kill browser process");
            }
        } else if let Err(err) = self.browser.wait().await {
            debug!(error = %err, "browser process did not report exit status");
        }

        self.handler_task.abort();

        if let Err(err) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            debug!(
                profile = %self.profile_dir.display(),
                error = %err,
                "failed to remove browser profile"
            );
        }

        closed
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();

        // Only reached when `close` never ran, e.g. the runtime shut down
        // mid-render. Dropping `Browser` kills the process.
        if !self.closed {
            if let Err(err) = std::fs::remove_dir_all(&self.profile_dir) {
                debug!(
                    profile = %self.profile_dir.display(),
                    error = %err,
                    "failed to remove browser profile on drop"
                );
            }
        }
    }
}
