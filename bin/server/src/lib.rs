//! portico web server.
//!
//! Logs users in through an OpenID Connect provider using the
//! authorization-code flow, keeps who they are in a server-side session and
//! provisions a local user record the first time a subject logs in.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
pub mod server_helpers;
