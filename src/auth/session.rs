//! Session model and the token/user store
//!
//! The session lives in browser storage under two fixed keys: the bearer
//! token as a raw string and the user as JSON. A store without a browsing
//! context is "detached": it never persists and always loads nothing.

use serde::{Deserialize, Deserializer, Serialize};

use super::browser::Storage;
use super::role::Role;

/// Storage key for the bearer token string
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key for the JSON-encoded user
pub const USER_KEY: &str = "auth_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Backend ids arrive as numbers, portals handle them as strings
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}

pub struct SessionStore<S> {
    storage: Option<S>,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Store outside a browsing context: every operation is a no-op
    pub fn detached() -> Self {
        Self { storage: None }
    }

    pub fn is_detached(&self) -> bool {
        self.storage.is_none()
    }

    pub fn save(&self, session: &Session) {
        let Some(storage) = &self.storage else {
            return;
        };

        match serde_json::to_string(&session.user) {
            Ok(user_json) => {
                storage.set(TOKEN_KEY, &session.token);
                storage.set(USER_KEY, &user_json);
                tracing::debug!(user_id = %session.user.id, role = %session.user.role, "Session saved");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode user; session not saved");
            }
        }
    }

    /// Load the stored session; missing or corrupt entries read as no session
    pub fn load(&self) -> Option<Session> {
        let storage = self.storage.as_ref()?;

        let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user_json = storage.get(USER_KEY)?;

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some(Session { user, token }),
            Err(e) => {
                tracing::debug!(error = %e, "Stored user is not valid JSON; treating as signed out");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Some(storage) = &self.storage {
            storage.remove(TOKEN_KEY);
            storage.remove(USER_KEY);
        }
    }
}
