use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Label used for every unexpected failure
pub const SERVER_ERROR_LABEL: &str = "Erreur serveur";

/// Failure of a proxied request
///
/// Every variant renders as a JSON envelope; nothing escapes a proxy route
/// as a bare error.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No `Authorization` header; the backend was not contacted
    #[error("missing Authorization header")]
    MissingCredential,

    /// Backend answered with a non-2xx status
    #[error("{label} ({status})")]
    BackendRejection {
        status: StatusCode,
        label: &'static str,
        details: String,
    },

    /// Network failure, malformed input or unreadable backend payload
    #[error("{0}")]
    Transport(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredential => StatusCode::UNAUTHORIZED,
            ProxyError::BackendRejection { status, .. } => *status,
            ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Transport(e.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ProxyError::MissingCredential => (
                status,
                Json(json!({
                    "error": "Non autorisé",
                    "details": "Token d'authentification manquant",
                    "status": status.as_u16()
                })),
            )
                .into_response(),

            ProxyError::BackendRejection { label, details, .. } => (
                status,
                Json(json!({
                    "error": label,
                    "details": details
                })),
            )
                .into_response(),

            ProxyError::Transport(message) => (
                status,
                Json(json!({
                    "error": SERVER_ERROR_LABEL,
                    "message": message
                })),
            )
                .into_response(),
        }
    }
}
