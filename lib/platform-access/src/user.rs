//! Local user records.
//!
//! A user is provisioned the first time a subject completes a login and is
//! identified from then on by the provider's subject claim. The login flow
//! only ever reads or creates users; it never updates or deletes them.

use chrono::{DateTime, Utc};
use portico_core::UserId;
use serde::{Deserialize, Serialize};

/// A local user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID.
    id: UserId,
    /// Subject claim - stable, unique identifier issued by the identity provider.
    external_subject_id: String,
    /// Email captured at provisioning time. Not guaranteed unique.
    email: String,
    /// When the user record was created.
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user for a subject seen for the first time.
    ///
    /// The user ID and creation timestamp are generated here.
    #[must_use]
    pub fn new(external_subject_id: String, email: String) -> Self {
        Self {
            id: UserId::new(),
            external_subject_id,
            email,
            created_at: Utc::now(),
        }
    }

    /// Reconstitutes a user from storage.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        external_subject_id: String,
        email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            external_subject_id,
            email,
            created_at,
        }
    }

    /// Returns the user's internal ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the provider's subject identifier.
    #[must_use]
    pub fn external_subject_id(&self) -> &str {
        &self.external_subject_id
    }

    /// Returns the stored email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns when the user was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
