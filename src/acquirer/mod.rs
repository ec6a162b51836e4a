pub mod chromium;
pub mod errors;
pub mod http;
pub mod rendered;

pub use chromium::ChromiumLauncher;
pub use errors::AcquireError;
pub use http::{HttpAcquirer, fetch, get_client};
pub use rendered::{BrowserLauncher, BrowserSession, RenderedAcquirer};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr, sync::Arc};
use url::Url;

/// Desktop Chrome identity presented by both strategies.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single HTTP fetch of the raw markup.
    Static,
    /// Headless browser render; scripts run before the markup is captured.
    Rendered,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rendered => "rendered",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "rendered" => Ok(Self::Rendered),
            other => Err(format!(
                "unknown strategy '{}', expected 'static' or 'rendered'",
                other
            )),
        }
    }
}

/// Retrieves the markup of a page. `container_selector` lets strategies that
/// can observe a live DOM wait for the repeating element before capturing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentAcquirer: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn acquire(&self, url: &Url, container_selector: &str) -> Result<String, AcquireError>;
}

pub fn for_strategy(
    strategy: Strategy,
    chrome_executable: Option<PathBuf>,
) -> Arc<dyn DocumentAcquirer> {
    match strategy {
        Strategy::Static => Arc::new(HttpAcquirer),
        Strategy::Rendered => Arc::new(RenderedAcquirer::new(ChromiumLauncher::new(
            chrome_executable,
        ))),
    }
}
