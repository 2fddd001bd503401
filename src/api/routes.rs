use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Watchlist session
        .route(
            "/watchlist",
            put(handlers::upload_watchlist)
                .get(handlers::get_watchlist)
                .delete(handlers::clear_watchlist),
        )
        // Recommendations
        .route("/scan", post(handlers::scan))
        .route("/recommendations", post(handlers::recommend))
        // Request ID must be assigned before the trace span is created
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
