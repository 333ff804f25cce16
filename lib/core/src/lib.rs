//! Core types shared across the portico workspace.
//!
//! This crate provides the strongly-typed user identifier and the
//! random token generator used for anti-forgery state values and
//! session identifiers.

pub mod id;
pub mod token;

pub use id::{ParseIdError, UserId};
pub use token::{EntropyError, TOKEN_BYTES, random_token};
