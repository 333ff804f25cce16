//! Server-side sessions.
//!
//! A session is referenced by an opaque ID carried in a cookie. Its profile
//! records who completed the login: the verified claims plus the reconciled
//! local user. Sessions live for a fixed duration from creation.

use chrono::{DateTime, Duration, Utc};
use portico_core::{EntropyError, UserId, random_token};
use serde::{Deserialize, Serialize};

use crate::claims::RawClaims;
use crate::user::User;

/// Unique identifier for a session.
///
/// Session IDs are opaque strings generated during session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random session ID.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] if the system random source fails.
    pub fn generate() -> Result<Self, EntropyError> {
        random_token().map(Self)
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who a session belongs to.
///
/// Serialized as JSON into the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionProfile {
    /// Every claim from the verified identity token.
    pub claims: RawClaims,
    /// The reconciled local user.
    pub user_id: UserId,
    /// The email stored on the user record.
    pub email: String,
    /// The provider's subject identifier.
    pub external_subject_id: String,
    /// When the user record was created.
    pub created_at: DateTime<Utc>,
}

impl SessionProfile {
    /// Builds a profile from the reconciled user and the verified claims.
    ///
    /// Identity fields always come from the user record, not from the
    /// claims, so a changed email at the provider does not show up here.
    #[must_use]
    pub fn new(user: &User, claims: RawClaims) -> Self {
        Self {
            claims,
            user_id: user.id(),
            email: user.email().to_string(),
            external_subject_id: user.external_subject_id().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// A server-side session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,
    /// Populated once a login completes.
    profile: Option<SessionProfile>,
    /// When the session was created.
    created_at: DateTime<Utc>,
    /// When the session expires.
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session valid for `duration` from now.
    #[must_use]
    pub fn new(id: SessionId, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            profile: None,
            created_at: now,
            expires_at: now + duration,
        }
    }

    /// Reconstitutes a session from storage.
    #[must_use]
    pub fn with_all_fields(
        id: SessionId,
        profile: Option<SessionProfile>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            created_at,
            expires_at,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the profile, if a login has completed.
    #[must_use]
    pub fn profile(&self) -> Option<&SessionProfile> {
        self.profile.as_ref()
    }

    /// Replaces the profile.
    pub fn set_profile(&mut self, profile: SessionProfile) {
        self.profile = Some(profile);
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session carries a profile.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }
}
