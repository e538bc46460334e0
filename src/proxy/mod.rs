//! Same-origin proxy onto the backend REST API
//!
//! ## Structure
//!
//! - `routes`: static table of (resource, method) pairs
//! - `error`: three-tier error envelope
//! - `login`: login payload reshaping
//!
//! ## Forwarding Contract
//!
//! 1. Bearer routes without `Authorization` fail with 401, backend untouched
//! 2. Path parameters and allow-listed query parameters are percent-encoded
//!    into the backend URL; `Authorization` is forwarded unchanged
//! 3. Non-2xx: backend status with `{error, details}` (raw body as text)
//! 4. 2xx: backend JSON verbatim, or `{success, message}` when the route
//!    confirms or the body is not JSON
//! 5. Anything else: 500 `{error: "Erreur serveur", message}`

pub mod error;
pub mod login;
pub mod routes;

pub use error::ProxyError;
pub use routes::{route, RouteSpec, ROUTES};

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use routes::{Access, BodyKind, Reshape, Success, SEARCH_PARAM};

/// Message returned for successful calls without a usable JSON body
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Opération réussie";

/// Inbound request, already split by the web layer
#[derive(Debug, Default)]
pub struct ProxyRequest {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub authorization: Option<HeaderValue>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl ProxyRequest {
    pub fn from_parts(
        params: HashMap<String, String>,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            params,
            query,
            authorization: headers.get(header::AUTHORIZATION).cloned(),
            content_type: headers.get(header::CONTENT_TYPE).cloned(),
            body,
        }
    }
}

/// Successful proxy outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Fingerprint a credential for logs; raw tokens are never logged
pub fn token_fingerprint(value: &HeaderValue) -> String {
    format!("{:x}", md5::compute(value.as_bytes()))
}

pub struct Forwarder {
    backend_url: String,
    client: reqwest::Client,
    probe_client: reqwest::Client,
}

impl Forwarder {
    pub fn new(
        backend_url: impl Into<String>,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
        probe_timeout_ms: u64,
    ) -> Result<Self, reqwest::Error> {
        let backend_url = backend_url.into().trim_end_matches('/').to_string();

        // Redirects are surfaced as backend rejections, never followed
        let client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()?;

        let probe_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_millis(probe_timeout_ms))
            .timeout(Duration::from_millis(probe_timeout_ms))
            .build()?;

        Ok(Self {
            backend_url,
            client,
            probe_client,
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Build the backend URL for `route`
    pub fn target_url(
        &self,
        route: &RouteSpec,
        request: &ProxyRequest,
    ) -> Result<String, ProxyError> {
        let searching = request
            .query
            .get(SEARCH_PARAM)
            .is_some_and(|k| !k.trim().is_empty());
        let template = match route.search {
            Some(search) if searching => search,
            _ => route.backend,
        };

        let mut url = format!("{}{}", self.backend_url, fill_template(template, &request.params)?);

        let pairs: Vec<String> = route
            .query
            .iter()
            .filter_map(|key| {
                request
                    .query
                    .get(*key)
                    .map(|value| format!("{}={}", key, urlencoding::encode(value)))
            })
            .collect();
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        Ok(url)
    }

    /// Forward one request; every outcome is either `Forwarded` or a `ProxyError`
    pub async fn forward(
        &self,
        route: &RouteSpec,
        request: ProxyRequest,
    ) -> Result<Forwarded, ProxyError> {
        let started = Instant::now();
        let token_hash = request.authorization.as_ref().map(token_fingerprint);

        let result = self.forward_inner(route, request).await;

        match &result {
            Ok(forwarded) => tracing::info!(
                route = route.name,
                method = %route.verb.method(),
                status = forwarded.status.as_u16(),
                token_hash = ?token_hash,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Proxied request"
            ),
            Err(ProxyError::MissingCredential) => tracing::warn!(
                route = route.name,
                "Rejected proxy request without Authorization header"
            ),
            Err(ProxyError::BackendRejection { status, details, .. }) => tracing::warn!(
                route = route.name,
                method = %route.verb.method(),
                status = status.as_u16(),
                details_len = details.len(),
                token_hash = ?token_hash,
                "Backend rejected proxied request"
            ),
            Err(ProxyError::Transport(message)) => tracing::error!(
                route = route.name,
                method = %route.verb.method(),
                error = %message,
                token_hash = ?token_hash,
                "Proxy request failed"
            ),
        }

        result
    }

    async fn forward_inner(
        &self,
        route: &RouteSpec,
        request: ProxyRequest,
    ) -> Result<Forwarded, ProxyError> {
        let authorization = match route.access {
            Access::Bearer => Some(
                request
                    .authorization
                    .clone()
                    .ok_or(ProxyError::MissingCredential)?,
            ),
            Access::Anonymous => None,
        };

        let url = self.target_url(route, &request)?;

        let mut builder = self
            .client
            .request(route.verb.method(), &url)
            .header(header::ACCEPT, "application/json");
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }

        builder = match route.body {
            BodyKind::Empty => builder,
            BodyKind::Json if request.body.is_empty() => builder,
            BodyKind::Json => {
                let payload: Value = serde_json::from_slice(&request.body)
                    .map_err(|e| ProxyError::Transport(format!("Corps JSON invalide: {}", e)))?;
                builder.json(&payload)
            }
            BodyKind::Multipart => {
                let content_type = request.content_type.clone().ok_or_else(|| {
                    ProxyError::Transport("Content-Type multipart manquant".to_string())
                })?;
                builder
                    .header(header::CONTENT_TYPE, content_type)
                    .body(request.body)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        // Read as text first: error and success bodies are not guaranteed JSON
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProxyError::BackendRejection {
                status,
                label: route.label,
                details: text,
            });
        }

        // Gateway-built bodies go out as 200: a relayed 204 would drop them
        let (status, body) = match route.success {
            Success::Confirm(message) => (StatusCode::OK, confirmation(message)),
            Success::Passthrough => match parse_success_body(&text) {
                Some(body) => (status, body),
                None => (StatusCode::OK, confirmation(DEFAULT_SUCCESS_MESSAGE)),
            },
        };

        let body = match route.reshape {
            Reshape::None => body,
            Reshape::Login => serde_json::to_value(login::reshape_login(body)?)
                .map_err(|e| ProxyError::Transport(e.to_string()))?,
        };

        Ok(Forwarded { status, body })
    }

    /// Reachability of the backend origin: any HTTP answer counts as up
    pub async fn probe(&self) -> bool {
        match self.probe_client.head(&self.backend_url).send().await {
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Backend probe answered");
                true
            }
            Err(e) => {
                tracing::warn!(backend_url = %self.backend_url, error = %e, "Backend unreachable");
                false
            }
        }
    }
}

fn confirmation(message: &str) -> Value {
    json!({ "success": true, "message": message })
}

/// Success bodies are parsed defensively; `None` when empty or not JSON
fn parse_success_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .map_err(|e| tracing::debug!(error = %e, "Backend success body is not JSON"))
        .ok()
}

/// Substitute `{name}` placeholders with percent-encoded parameters
fn fill_template(template: &str, params: &HashMap<String, String>) -> Result<String, ProxyError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let end = rest[start..]
            .find('}')
            .map(|i| start + i)
            .ok_or_else(|| ProxyError::Transport(format!("Modèle de route invalide: {}", template)))?;
        let name = &rest[start + 1..end];
        let value = params
            .get(name)
            .ok_or_else(|| ProxyError::Transport(format!("Paramètre manquant: {}", name)))?;
        out.push_str(&urlencoding::encode(value));
        rest = &rest[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
