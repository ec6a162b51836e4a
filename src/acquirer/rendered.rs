use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;
use tracing::{Instrument, debug, instrument, warn};
use url::Url;

use crate::acquirer::{DocumentAcquirer, Strategy, errors::AcquireError};

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(45);
const SELECTOR_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// One live browser instance with at most one open page.
///
/// Implementations must tolerate `close` being the only call made after
/// `launch`, since navigation can fail before a page exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserSession: Send {
    /// Open a page and navigate it to `url`, returning once the initial DOM
    /// has been constructed.
    async fn navigate(&mut self, url: &str) -> Result<(), AcquireError>;

    /// Resolve once `selector` matches in the live DOM. May poll forever;
    /// callers bound it with a timeout.
    async fn wait_for_selector(&mut self, selector: &str) -> Result<(), AcquireError>;

    async fn content(&mut self) -> Result<String, AcquireError>;

    async fn close(&mut self) -> Result<(), AcquireError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, AcquireError>;
}

/// Renders the page in a fresh browser per request. The browser is closed
/// exactly once on every path out of `acquire`, including when the caller
/// drops the `acquire` future: the render runs on its own task, which keeps
/// going until teardown is done.
pub struct RenderedAcquirer<L> {
    launcher: Arc<L>,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl<L: BrowserLauncher + 'static> RenderedAcquirer<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher: Arc::new(launcher),
            navigation_timeout: NAVIGATION_TIMEOUT,
            selector_timeout: SELECTOR_WAIT_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, navigation: Duration, selector: Duration) -> Self {
        self.navigation_timeout = navigation;
        self.selector_timeout = selector;
        self
    }
}

async fn render(
    session: &mut dyn BrowserSession,
    url: &Url,
    container_selector: &str,
    navigation_timeout: Duration,
    selector_timeout: Duration,
) -> Result<String, AcquireError> {
    timeout(navigation_timeout, session.navigate(url.as_str()))
        .await
        .map_err(|_| AcquireError::NavigationTimeout(navigation_timeout.as_secs()))??;

    match timeout(selector_timeout, session.wait_for_selector(container_selector)).await {
        Ok(Ok(())) => debug!(selector = container_selector, "container selector present"),
        Ok(Err(err)) => warn!(
            selector = container_selector,
            error = %err,
            "waiting for container selector failed, continuing with current DOM"
        ),
        Err(_) => warn!(
            selector = container_selector,
            timeout_secs = selector_timeout.as_secs(),
            "container selector did not appear, continuing with current DOM"
        ),
    }

    session.content().await
}

#[async_trait]
impl<L: BrowserLauncher + 'static> DocumentAcquirer for RenderedAcquirer<L> {
    fn strategy(&self) -> Strategy {
        Strategy::Rendered
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn acquire(&self, url: &Url, container_selector: &str) -> Result<String, AcquireError> {
        let launcher = Arc::clone(&self.launcher);
        let url = url.clone();
        let container_selector = container_selector.to_string();
        let (navigation_timeout, selector_timeout) =
            (self.navigation_timeout, self.selector_timeout);

        let task = tokio::spawn(
            async move {
                let mut session = launcher.launch().await?;

                let rendered = render(
                    session.as_mut(),
                    &url,
                    &container_selector,
                    navigation_timeout,
                    selector_timeout,
                )
                .await;

                if let Err(err) = session.close().await {
                    warn!(error = %err, "browser teardown failed");
                }

                rendered
            }
            .in_current_span(),
        );

        task.await
            .map_err(|err| AcquireError::Unknown(format!("render task failed: {}", err)))?
    }
}
