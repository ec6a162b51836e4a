use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    acquirer::AcquireError, extractor::ExtractError, scrape::ErrorResponse,
    selector::SelectorError,
};

/// Request-fatal failures of the scrape pipeline. Field-level selector
/// problems never reach this type.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("Failed to fetch page: {0}")]
    Acquire(#[from] AcquireError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl ScrapeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Input(_) => StatusCode::BAD_REQUEST,
            Self::Selector(_) | Self::Acquire(_) | Self::Extract(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
