//! Authentication module for the portico server.
//!
//! This module provides:
//! - The OIDC client for the configured identity provider
//! - Database-backed user and session repositories
//! - The login, callback and logout handlers
//! - Session extractors and the guard for protected routes
//!
//! Handlers never touch the database or the provider directly. They go
//! through the [`IdentityProvider`], [`UserStore`] and [`SessionStore`]
//! contracts held in [`AppState`], so the router can run against in-memory
//! stores in tests.

pub mod db;
pub mod flow;
pub mod middleware;
pub mod oidc;
pub mod routes;

use crate::config::SessionConfig;
use portico_platform_access::{IdentityProvider, OidcConfig, SessionStore, UserStore};
use std::sync::Arc;

pub use middleware::{OptionalSession, require_session};
pub use oidc::OidcClient;
pub use routes::{callback, login, logout};

/// Shared application state.
pub struct AppState {
    /// Identity provider for the authorization-code flow.
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Local user records.
    pub users: Arc<dyn UserStore>,
    /// Server-side sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// Provider settings, used to build the logout URL.
    pub oidc_config: OidcConfig,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        oidc_config: OidcConfig,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            identity_provider,
            users,
            sessions,
            oidc_config,
            session_config,
        }
    }
}
