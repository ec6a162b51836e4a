use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    health::{self, HealthResponse},
    scrape::{self, ErrorResponse, ExtractedRecord, FieldSelector, ScrapePayload, ScrapeResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(scrape::handlers::scrape, health::health_check),
    components(schemas(
        ScrapePayload,
        FieldSelector,
        ScrapeResponse,
        ExtractedRecord,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "scrape", description = "Selector-driven extraction"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/scrape",
            post(scrape::handlers::scrape).fallback(scrape::handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(health::health_check).fallback(scrape::handlers::method_not_allowed),
        )
}

/// Every route is served both at the root and under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api = api_routes();

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Also answers every OPTIONS request with an empty 200.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
