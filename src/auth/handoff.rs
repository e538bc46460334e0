//! Cross-portal session hand-off through the `auth` query parameter
//!
//! The login portal cannot share storage with the role portals (different
//! origins), so it appends `?auth=<url-encoded JSON>` to the destination URL.
//! The destination decodes it once, persists it and strips it from the
//! address bar.
//!
//! Two payload shapes are accepted and decode to the same [`Session`]:
//!
//! ```text
//! {"user": {"id": "7", "email": ..., "name": ..., "role": "admin"}, "token": "t"}
//! {"id": 7, "email": ..., "name": ..., "role": "admin", "token": "t"}
//! ```

use serde::Deserialize;

use super::session::{Session, User};

/// Query parameter carrying the encoded session
pub const HANDOFF_PARAM: &str = "auth";

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("invalid portal origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Nested {
        user: User,
        token: String,
    },
    Flat {
        #[serde(flatten)]
        user: User,
        token: String,
    },
}

impl From<Payload> for Session {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Nested { user, token } | Payload::Flat { user, token } => {
                Session { user, token }
            }
        }
    }
}

/// Parse the raw (already percent-decoded) parameter value
fn parse_payload(raw: &str) -> Option<Session> {
    let session: Session = serde_json::from_str::<Payload>(raw).ok()?.into();
    if session.token.is_empty() {
        return None;
    }
    Some(session)
}

/// Decode a hand-off from `href`
///
/// Returns the session together with the URL to show once the parameter is
/// removed. Absent or malformed payloads yield `None`.
pub fn decode_handoff(href: &str) -> Option<(Session, String)> {
    let mut url = url::Url::parse(href).ok()?;

    let raw = url
        .query_pairs()
        .find(|(key, _)| key == HANDOFF_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let Some(session) = parse_payload(&raw) else {
        tracing::warn!(payload_len = raw.len(), "Ignoring malformed hand-off payload");
        return None;
    };

    // Other segments are kept byte for byte, never re-encoded
    let remaining = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty() && !is_handoff_segment(segment))
        .collect::<Vec<_>>()
        .join("&");

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&remaining));
    }

    Some((session, url.into()))
}

fn is_handoff_segment(segment: &str) -> bool {
    let key = segment.split('=').next().unwrap_or_default();
    urlencoding::decode(key).is_ok_and(|key| key == HANDOFF_PARAM)
}

/// Build the destination URL that hands `session` to the portal at `origin`
pub fn handoff_url(origin: &str, session: &Session) -> Result<String, HandoffError> {
    let mut url = url::Url::parse(origin)?;
    let payload = serde_json::to_string(session)?;
    let query = format!("{}={}", HANDOFF_PARAM, urlencoding::encode(&payload));
    url.set_query(Some(&query));
    Ok(url.into())
}
