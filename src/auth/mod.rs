//! Browser-side authentication
//!
//! This module holds everything a portal needs to know who is signed in.
//!
//! ## Structure
//!
//! - `role`: closed role set and the role -> portal origin table
//! - `browser`: storage, address bar and navigation traits
//! - `session`: session model and the token/user store
//! - `handoff`: `?auth=` payload codec used between portals
//! - `service`: session reader plus login/logout flows
//! - `gate`: per-portal role gate
//!
//! ## Hand-off Flow
//!
//! 1. User signs in on the login portal -> session saved there
//! 2. Login portal navigates to the role's portal with `?auth=<session>`
//! 3. Destination gate reads the hand-off, saves it, strips the parameter
//! 4. Later loads resolve the session from the destination's own storage

pub mod browser;
pub mod gate;
pub mod handoff;
pub mod role;
pub mod service;
pub mod session;

pub use browser::{History, MemoryHistory, MemoryStorage, Navigator, Storage};
pub use gate::{transition, GateEvent, GateState, GateView, RoleGate};
pub use handoff::{decode_handoff, handoff_url, HandoffError, HANDOFF_PARAM};
pub use role::{PortalOrigins, Role, UnknownRole};
pub use service::AuthService;
pub use session::{Session, SessionStore, User, TOKEN_KEY, USER_KEY};
