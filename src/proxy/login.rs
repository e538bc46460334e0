//! Login payload reshaping
//!
//! The backend answers a login with a flat record and an upper-case role; the
//! portals expect a [`Session`].

use serde::Deserialize;
use serde_json::Value;

use super::error::ProxyError;
use crate::auth::role::Role;
use crate::auth::session::{string_or_number, Session, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendLogin {
    #[serde(deserialize_with = "string_or_number")]
    user_id: String,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    role: String,
    token: String,
}

/// Map `{userId, email, firstName, lastName, role, token}` onto a session
pub fn reshape_login(body: Value) -> Result<Session, ProxyError> {
    let login: BackendLogin = serde_json::from_value(body)
        .map_err(|e| ProxyError::Transport(format!("Réponse de connexion invalide: {}", e)))?;

    // The portals refuse a session without a token
    if login.token.trim().is_empty() {
        return Err(ProxyError::Transport(
            "Réponse de connexion invalide: token vide".to_string(),
        ));
    }

    let role: Role = login
        .role
        .parse()
        .map_err(|e| ProxyError::Transport(format!("Réponse de connexion invalide: {}", e)))?;

    let name = format!("{} {}", login.first_name.trim(), login.last_name.trim())
        .trim()
        .to_string();

    Ok(Session {
        user: User {
            id: login.user_id,
            email: login.email,
            name,
            role,
        },
        token: login.token,
    })
}
