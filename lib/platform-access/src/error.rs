//! Error types for the platform-access crate.
//!
//! One enum per collaborator, so the login flow can map each failure to a
//! response without inspecting messages:
//! - `ExchangeError`: the code-for-token exchange failed
//! - `VerificationError`: the identity token was not trusted
//! - `ClaimsError`: verified claims lack what login needs
//! - `UserStoreError`: user persistence failed
//! - `SessionStoreError`: session persistence failed

use std::fmt;

/// Errors from exchanging an authorization code for tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The exchange request could not be built.
    Configuration { reason: String },
    /// The provider rejected the code or could not be reached.
    Request { reason: String },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => {
                write!(f, "token exchange misconfigured: {reason}")
            }
            Self::Request { reason } => {
                write!(f, "token exchange failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Errors from verifying an identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The token response carried no identity token.
    MissingIdToken,
    /// The identity token could not be parsed.
    Malformed { reason: String },
    /// Signature, issuer, audience or expiry validation failed.
    Rejected { reason: String },
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdToken => write!(f, "no identity token in token response"),
            Self::Malformed { reason } => write!(f, "malformed identity token: {reason}"),
            Self::Rejected { reason } => write!(f, "identity token rejected: {reason}"),
        }
    }
}

impl std::error::Error for VerificationError {}

/// Errors from interpreting verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The `sub` claim is absent or not a string.
    MissingSubject,
}

impl fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSubject => write!(f, "missing required claim: sub"),
        }
    }
}

impl std::error::Error for ClaimsError {}

/// Errors from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStoreError {
    /// A user with this subject already exists.
    Conflict { subject: String },
    /// The store is unavailable or the query failed.
    Database { details: String },
}

impl fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { subject } => {
                write!(f, "user with subject '{subject}' already exists")
            }
            Self::Database { details } => write!(f, "user database error: {details}"),
        }
    }
}

impl std::error::Error for UserStoreError {}

/// Errors from the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    /// The backing store is unavailable or the query failed.
    Backend { details: String },
    /// A stored profile could not be decoded.
    Corrupt { session_id: String, reason: String },
}

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { details } => write!(f, "session store error: {details}"),
            Self::Corrupt { session_id, reason } => {
                write!(f, "session '{session_id}' is corrupt: {reason}")
            }
        }
    }
}

impl std::error::Error for SessionStoreError {}
