//! Session reader and login/logout flows
//!
//! `AuthService` is built once per portal and handed to every component that
//! needs the current user. It owns nothing global: storage, address bar and
//! origin table are injected so tests run against isolated instances.

use super::browser::{History, Storage};
use super::handoff::{decode_handoff, handoff_url, HandoffError};
use super::role::PortalOrigins;
use super::session::{Session, SessionStore, User};

pub struct AuthService<S, H> {
    store: SessionStore<S>,
    history: H,
    origins: PortalOrigins,
}

impl<S: Storage, H: History> AuthService<S, H> {
    pub fn new(store: SessionStore<S>, history: H, origins: PortalOrigins) -> Self {
        Self {
            store,
            history,
            origins,
        }
    }

    pub fn origins(&self) -> &PortalOrigins {
        &self.origins
    }

    /// Consume a hand-off from the current URL, if any
    ///
    /// On success the session is persisted and the parameter is removed from
    /// the address bar with a history replace.
    pub fn take_handoff(&self) -> Option<Session> {
        let (session, stripped) = decode_handoff(&self.history.href())?;

        self.store.save(&session);
        self.history.replace_state(&stripped);

        tracing::info!(
            user_id = %session.user.id,
            role = %session.user.role,
            "Session received through portal hand-off"
        );
        Some(session)
    }

    /// Resolve the current session; a pending hand-off wins over storage
    pub fn current_session(&self) -> Option<Session> {
        self.take_handoff().or_else(|| self.store.load())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_session().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// `Authorization` header value for calls to the proxy routes
    pub fn authorization_header(&self) -> Option<String> {
        self.store.load().map(|s| format!("Bearer {}", s.token))
    }

    /// Persist a fresh login and return the URL of the user's own portal
    ///
    /// The URL carries the session as a hand-off since the destination portal
    /// cannot read this origin's storage.
    pub fn complete_login(&self, session: &Session) -> Result<String, HandoffError> {
        self.store.save(session);

        let origin = self.origins.origin_for(Some(session.user.role));
        let destination = handoff_url(origin, session)?;

        tracing::info!(
            user_id = %session.user.id,
            role = %session.user.role,
            origin = %origin,
            "Login complete, handing session to portal"
        );
        Ok(destination)
    }

    /// Forget the session and return the login origin to navigate to
    pub fn logout(&self) -> String {
        self.store.clear();
        tracing::info!("Session cleared");
        self.origins.login.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::browser::{MemoryHistory, MemoryStorage};
    use crate::auth::fixtures::session;
    use crate::auth::role::Role;

    fn service<'a>(
        storage: &'a MemoryStorage,
        history: &'a MemoryHistory,
    ) -> AuthService<&'a MemoryStorage, &'a MemoryHistory> {
        AuthService::new(SessionStore::new(storage), history, PortalOrigins::default())
    }

    #[test]
    fn test_no_session_anywhere() {
        let storage = MemoryStorage::new();
        let history = MemoryHistory::new("http://localhost:3003/");
        let auth = service(&storage, &history);

        assert_eq!(auth.current_user(), None);
        assert!(!auth.is_authenticated());
        assert_eq!(auth.authorization_header(), None);
    }

    #[test]
    fn test_handoff_wins_over_stale_storage() {
        let storage = MemoryStorage::new();
        let stale = session(Role::Student);
        SessionStore::new(&storage).save(&stale);

        let mut fresh = session(Role::Professor);
        fresh.user.id = "99".to_string();
        fresh.token = "fresh".to_string();
        let href = handoff_url("http://localhost:3003", &fresh).unwrap();

        let history = MemoryHistory::new(href);
        let auth = service(&storage, &history);

        assert_eq!(auth.current_user(), Some(fresh.user.clone()));
        assert_eq!(auth.authorization_header(), Some("Bearer fresh".to_string()));
    }

    #[test]
    fn test_reader_is_idempotent_without_handoff() {
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Admin));
        let history = MemoryHistory::new("http://localhost:3001/");
        let auth = service(&storage, &history);

        let first = auth.current_user();
        let second = auth.current_user();
        assert_eq!(first, second);
        assert_eq!(first.map(|u| u.role), Some(Role::Admin));
    }

    #[test]
    fn test_handoff_is_stripped_and_survives_reload() {
        let storage = MemoryStorage::new();
        let professor = session(Role::Professor);
        let href = handoff_url("http://localhost:3003", &professor).unwrap();
        let history = MemoryHistory::new(href);
        let auth = service(&storage, &history);

        assert_eq!(auth.current_user(), Some(professor.user.clone()));
        assert_eq!(history.href(), "http://localhost:3003/");

        // Reload without the parameter: storage still resolves the same user
        history.load("http://localhost:3003/");
        assert_eq!(auth.current_user(), Some(professor.user));
    }

    #[test]
    fn test_malformed_handoff_has_no_side_effects() {
        let storage = MemoryStorage::new();
        let history = MemoryHistory::new("http://localhost:3003/?auth=%7Bbroken");
        let auth = service(&storage, &history);

        assert_eq!(auth.take_handoff(), None);
        assert_eq!(history.href(), "http://localhost:3003/?auth=%7Bbroken");
        assert_eq!(SessionStore::new(&storage).load(), None);
    }

    #[test]
    fn test_complete_login_redirects_to_role_portal() {
        let storage = MemoryStorage::new();
        let history = MemoryHistory::new("http://localhost:3000/login");
        let auth = service(&storage, &history);

        let admin = session(Role::Admin);
        let destination = auth.complete_login(&admin).unwrap();

        assert!(destination.starts_with("http://localhost:3001/?auth="));
        assert_eq!(SessionStore::new(&storage).load(), Some(admin.clone()));

        // The destination portal decodes the same session
        let (decoded, _) = decode_handoff(&destination).unwrap();
        assert_eq!(decoded, admin);
    }

    #[test]
    fn test_logout_clears_and_returns_login_origin() {
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Student));
        let history = MemoryHistory::new("http://localhost:3002/");
        let auth = service(&storage, &history);

        assert_eq!(auth.logout(), "http://localhost:3000");
        assert_eq!(auth.current_user(), None);
    }

    #[test]
    fn test_detached_service_never_resolves_storage() {
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Student));
        let history = MemoryHistory::new("http://localhost:3002/");
        let auth: AuthService<&MemoryStorage, _> =
            AuthService::new(SessionStore::detached(), &history, PortalOrigins::default());

        assert_eq!(auth.current_user(), None);
    }
}
