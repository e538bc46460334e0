use super::extractors::BearerToken;
use crate::{
    proxy::{routes::Access, ProxyRequest, RouteSpec},
    AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{on, MethodRouter},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Liveness probe - always returns OK if the process is running
pub async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe - checks if the backend answers at all
///
/// Returns 200 OK when the backend origin responds (any status), and
/// 503 Service Unavailable on connect errors or timeouts.
pub async fn readyz_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.forwarder.probe().await {
        (StatusCode::OK, "ready")
    } else {
        tracing::warn!("Readiness check failed: backend unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "not ready: backend unreachable")
    }
}

/// Role -> portal origin table for the login portal's redirect
pub async fn portals_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.portals.clone())
}

/// Method router forwarding `route` to the backend
pub fn proxy_route(route: &'static RouteSpec) -> MethodRouter<Arc<AppState>> {
    let filter = route.verb.filter();

    let method_router = if route.has_path_params() {
        on(
            filter,
            move |State(state): State<Arc<AppState>>,
                  Path(params): Path<HashMap<String, String>>,
                  Query(query): Query<HashMap<String, String>>,
                  headers: HeaderMap,
                  body: Bytes| async move {
                proxy(state, route, params, query, headers, body).await
            },
        )
    } else {
        on(
            filter,
            move |State(state): State<Arc<AppState>>,
                  Query(query): Query<HashMap<String, String>>,
                  headers: HeaderMap,
                  body: Bytes| async move {
                proxy(state, route, HashMap::new(), query, headers, body).await
            },
        )
    };

    match route.access {
        Access::Bearer => method_router.route_layer(middleware::from_fn(require_bearer)),
        Access::Anonymous => method_router,
    }
}

/// Rejects bearer routes without `Authorization` before any backend work
async fn require_bearer(_token: BearerToken, request: Request, next: Next) -> Response {
    next.run(request).await
}

async fn proxy(
    state: Arc<AppState>,
    route: &'static RouteSpec,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = ProxyRequest::from_parts(params, query, &headers, body);
    match state.forwarder.forward(route, request).await {
        Ok(forwarded) => forwarded.into_response(),
        Err(e) => e.into_response(),
    }
}
