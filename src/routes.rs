use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::handlers;
use crate::models::AppState;

// sets up all the routes for the web server
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", axum::routing::get(handlers::index))
        .route("/metar", axum::routing::get(handlers::fetch_metar_handler))
        .route("/metar/download", axum::routing::get(handlers::download_metar_handler))
        .route("/api/metar", axum::routing::get(handlers::api_metar_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
