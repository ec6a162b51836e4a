use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLimit,

    #[error("request failed with status code {}", .status.as_u16())]
    Http { status: reqwest::StatusCode },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation timeout of {0}s exceeded")]
    NavigationTimeout(u64),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl AcquireError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            Self::RedirectLimit
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }

    pub fn from_browser_error(err: impl std::fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}
