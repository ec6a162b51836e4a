use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{
    Client, ClientBuilder,
    header::{self, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::acquirer::{DocumentAcquirer, Strategy, USER_AGENT, errors::AcquireError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(45);
const MAX_REDIRECTS: usize = 5;
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

// Accept-Encoding is negotiated by reqwest from the gzip/brotli/deflate features.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .default_headers({
            let mut headers = HeaderMap::new();
            headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
            headers.insert(
                header::ACCEPT_LANGUAGE,
                HeaderValue::from_static(ACCEPT_LANGUAGE),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Plain GET of the target page. Scripts are never executed, so pages that
/// build their DOM client-side come back as an empty shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpAcquirer;

#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &Url) -> Result<String, AcquireError> {
    let response = get_client()
        .get(url.clone())
        .send()
        .await
        .map_err(AcquireError::from_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::Http { status });
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|e| AcquireError::Body(e.to_string()))?;

    debug!(final_url = %final_url, bytes = body.len(), "page fetched");
    Ok(body)
}

#[async_trait]
impl DocumentAcquirer for HttpAcquirer {
    fn strategy(&self) -> Strategy {
        Strategy::Static
    }

    async fn acquire(&self, url: &Url, _container_selector: &str) -> Result<String, AcquireError> {
        fetch(url).await
    }
}
