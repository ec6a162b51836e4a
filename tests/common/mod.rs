use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use harvester::{
    acquirer::HttpAcquirer, app_state::AppState, routes::create_router, sink::ResultSink,
};

pub fn test_app(sink: Option<Arc<dyn ResultSink>>) -> Router {
    create_router(AppState::new(Arc::new(HttpAcquirer), sink))
}

pub fn scrape_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
