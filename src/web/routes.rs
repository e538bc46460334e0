use super::handlers::{healthz_handler, portals_handler, proxy_route, readyz_handler};
use crate::{proxy::ROUTES, AppState};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/portals", get(portals_handler));

    // Same local path with several methods merges into one method router
    for route in ROUTES {
        router = router.route(route.local, proxy_route(route));
    }

    router
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
