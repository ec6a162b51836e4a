use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::{
    app_state::AppState,
    error::ScrapeError,
    pipeline,
    scrape::dtos::{ErrorResponse, ScrapePayload, ScrapeResponse},
};

#[utoipa::path(
    post,
    path = "/scrape",
    tag = "scrape",
    request_body = ScrapePayload,
    responses(
        (status = 200, description = "Records extracted", body = ScrapeResponse),
        (status = 400, description = "Missing url or selectors", body = ErrorResponse),
        (status = 500, description = "Selector, fetch or extraction failure", body = ErrorResponse)
    )
)]
pub async fn scrape(
    State(state): State<AppState>,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected scrape body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let request = match payload.into_request() {
        Ok(request) => request,
        Err(error) => {
            warn!(%error, "rejected scrape request");
            return ScrapeError::Input(error).into_response();
        }
    };

    match pipeline::run(&request, state.acquirer.as_ref(), state.sink.as_deref()).await {
        Ok(response) => {
            info!(
                url = %request.url,
                count = response.count,
                returned = response.results.len(),
                "scrape completed"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            error!(url = %request.url, error = %err, "scrape failed");
            err.into_response()
        }
    }
}

/// Any other method on an API route gets the same `{ error }` shape as the
/// rest of the surface.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
        .into_response()
}
