//! Campus portal library
//!
//! Provides the session hand-off and role gating shared by the portals, and
//! the same-origin proxy gateway in front of the backend REST API.

#![deny(dead_code)]

pub mod auth;
pub mod config;
pub mod proxy;
pub mod web;

use config::Config;
use proxy::Forwarder;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Shared backend client; handlers hold no other state
    pub forwarder: Arc<Forwarder>,
}
