//! Per-portal role gate
//!
//! Each portal mounts one gate for the role it serves. The gate starts in
//! `Checking`, resolves the session once and ends in exactly one terminal
//! state:
//!
//! - no session: redirect to the login portal
//! - role matches: authorized, portal content renders
//! - role mismatch: redirect to the user's own portal, carrying a hand-off
//! - role mismatch but the user's own portal is this one (two roles share an
//!   origin): forbidden

use serde::Serialize;

use super::browser::{History, Navigator, Storage};
use super::handoff::handoff_url;
use super::role::{PortalOrigins, Role};
use super::service::AuthService;
use super::session::{Session, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authorized(User),
    /// Whole-document navigation to the given URL is in progress
    Redirecting(String),
    /// Terminal: the resolved role has no other portal to go to
    Forbidden(Role),
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GateState::Checking)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// Outcome of the session reader
    Resolved(Option<Session>),
}

/// Single transition function for every portal gate
pub fn transition(
    state: GateState,
    event: GateEvent,
    required: Role,
    origins: &PortalOrigins,
) -> GateState {
    match (state, event) {
        (GateState::Checking, GateEvent::Resolved(None)) => {
            GateState::Redirecting(origins.login.clone())
        }
        (GateState::Checking, GateEvent::Resolved(Some(session))) => {
            let role = session.user.role;
            if role == required {
                return GateState::Authorized(session.user);
            }

            let own = origins.origin_for(Some(role));
            if own == origins.origin_for(Some(required)) {
                return GateState::Forbidden(role);
            }

            match handoff_url(own, &session) {
                Ok(url) => GateState::Redirecting(url),
                Err(e) => {
                    // Without a hand-off the user lands signed out on their portal
                    tracing::warn!(error = %e, origin = %own, "Failed to build hand-off URL");
                    GateState::Redirecting(own.to_string())
                }
            }
        }
        (terminal, _) => terminal,
    }
}

/// What the rendering tree sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub user: Option<User>,
    pub loading: bool,
}

pub struct RoleGate {
    required: Role,
    state: GateState,
}

impl RoleGate {
    pub fn new(required: Role) -> Self {
        Self {
            required,
            state: GateState::Checking,
        }
    }

    pub fn required(&self) -> Role {
        self.required
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Resolve the session and settle the gate; later calls are no-ops
    pub fn evaluate<S, H, N>(&mut self, auth: &AuthService<S, H>, navigator: &N) -> &GateState
    where
        S: Storage,
        H: History,
        N: Navigator,
    {
        if self.state.is_terminal() {
            return &self.state;
        }

        let session = auth.current_session();
        let previous = std::mem::replace(&mut self.state, GateState::Checking);
        self.state = transition(
            previous,
            GateEvent::Resolved(session),
            self.required,
            auth.origins(),
        );

        match &self.state {
            GateState::Checking => {}
            GateState::Authorized(user) => {
                tracing::info!(portal = %self.required, user_id = %user.id, "Portal access granted");
            }
            GateState::Redirecting(url) => {
                tracing::info!(portal = %self.required, "Redirecting away from portal");
                navigator.assign(url);
            }
            GateState::Forbidden(role) => {
                tracing::warn!(portal = %self.required, role = %role, "Role has no portal to redirect to");
            }
        }

        &self.state
    }

    pub fn view(&self) -> GateView {
        match &self.state {
            GateState::Authorized(user) => GateView {
                user: Some(user.clone()),
                loading: false,
            },
            GateState::Forbidden(_) => GateView {
                user: None,
                loading: false,
            },
            GateState::Checking | GateState::Redirecting(_) => GateView {
                user: None,
                loading: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::browser::testing::RecordingNavigator;
    use crate::auth::browser::{MemoryHistory, MemoryStorage};
    use crate::auth::fixtures::session;
    use crate::auth::handoff::decode_handoff;
    use crate::auth::session::SessionStore;

    fn service<'a>(
        storage: &'a MemoryStorage,
        history: &'a MemoryHistory,
        origins: PortalOrigins,
    ) -> AuthService<&'a MemoryStorage, &'a MemoryHistory> {
        AuthService::new(SessionStore::new(storage), history, origins)
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        // A student without any session opens the professor portal
        let storage = MemoryStorage::new();
        let history = MemoryHistory::new("http://localhost:3003/");
        let auth = service(&storage, &history, PortalOrigins::default());
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Professor);
        assert_eq!(gate.view(), GateView { user: None, loading: true });

        let state = gate.evaluate(&auth, &navigator).clone();
        assert_eq!(state, GateState::Redirecting("http://localhost:3000".to_string()));
        assert_eq!(*navigator.visited.borrow(), vec!["http://localhost:3000".to_string()]);
        assert_eq!(gate.view().user, None);
    }

    #[test]
    fn test_matching_role_is_authorized() {
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Admin));
        let history = MemoryHistory::new("http://localhost:3001/");
        let auth = service(&storage, &history, PortalOrigins::default());
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Admin);
        gate.evaluate(&auth, &navigator);

        assert_eq!(
            gate.view(),
            GateView {
                user: Some(session(Role::Admin).user),
                loading: false
            }
        );
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn test_role_mismatch_redirects_to_own_portal_with_handoff() {
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Student));
        let history = MemoryHistory::new("http://localhost:3003/");
        let auth = service(&storage, &history, PortalOrigins::default());
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Professor);
        gate.evaluate(&auth, &navigator);

        let visited = navigator.visited.borrow();
        assert_eq!(visited.len(), 1);
        assert!(visited[0].starts_with("http://localhost:3002/?auth="));
        let (handed, _) = decode_handoff(&visited[0]).unwrap();
        assert_eq!(handed, session(Role::Student));
        assert_eq!(gate.view().user, None);
    }

    #[test]
    fn test_role_mismatch_on_shared_origin_is_forbidden() {
        let origins = PortalOrigins {
            student: "http://localhost:3003".to_string(),
            ..PortalOrigins::default()
        };
        let storage = MemoryStorage::new();
        SessionStore::new(&storage).save(&session(Role::Student));
        let history = MemoryHistory::new("http://localhost:3003/");
        let auth = service(&storage, &history, origins);
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Professor);
        assert_eq!(
            gate.evaluate(&auth, &navigator),
            &GateState::Forbidden(Role::Student)
        );
        assert!(navigator.visited.borrow().is_empty());
        assert_eq!(gate.view(), GateView { user: None, loading: false });
    }

    #[test]
    fn test_professor_handoff_authorizes_and_strips_url() {
        let storage = MemoryStorage::new();
        let professor = session(Role::Professor);
        let href = handoff_url("http://localhost:3003", &professor).unwrap();
        let history = MemoryHistory::new(href);
        let auth = service(&storage, &history, PortalOrigins::default());
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Professor);
        gate.evaluate(&auth, &navigator);
        assert_eq!(gate.state(), &GateState::Authorized(professor.user.clone()));
        assert_eq!(history.href(), "http://localhost:3003/");

        // Reload: a fresh gate resolves the same user from storage
        history.load("http://localhost:3003/");
        let mut reloaded = RoleGate::new(Role::Professor);
        reloaded.evaluate(&auth, &navigator);
        assert_eq!(reloaded.state(), &GateState::Authorized(professor.user));
    }

    #[test]
    fn test_evaluates_once_per_mount() {
        let storage = MemoryStorage::new();
        let history = MemoryHistory::new("http://localhost:3001/");
        let auth = service(&storage, &history, PortalOrigins::default());
        let navigator = RecordingNavigator::default();

        let mut gate = RoleGate::new(Role::Admin);
        gate.evaluate(&auth, &navigator);

        // A session appearing later does not re-open a settled gate
        SessionStore::new(&storage).save(&session(Role::Admin));
        gate.evaluate(&auth, &navigator);

        assert!(matches!(gate.state(), GateState::Redirecting(_)));
        assert_eq!(navigator.visited.borrow().len(), 1);
    }

    #[test]
    fn test_terminal_states_ignore_events() {
        let origins = PortalOrigins::default();
        let authorized = GateState::Authorized(session(Role::Admin).user);
        let next = transition(
            authorized.clone(),
            GateEvent::Resolved(None),
            Role::Admin,
            &origins,
        );
        assert_eq!(next, authorized);

        let forbidden = GateState::Forbidden(Role::Student);
        let next = transition(
            forbidden.clone(),
            GateEvent::Resolved(Some(session(Role::Admin))),
            Role::Admin,
            &origins,
        );
        assert_eq!(next, forbidden);
    }
}
