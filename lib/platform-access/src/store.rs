//! Persistence contracts for users and sessions.

use async_trait::async_trait;

use crate::error::{SessionStoreError, UserStoreError};
use crate::session::{Session, SessionId};
use crate::user::User;

/// Storage for local user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by the provider's subject identifier.
    ///
    /// `Ok(None)` means no such user; `Err` means the lookup itself failed.
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserStoreError>;

    /// Inserts a new user.
    ///
    /// Returns [`UserStoreError::Conflict`] if the subject is already taken.
    async fn create(&self, user: &User) -> Result<(), UserStoreError>;
}

/// Server-side session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session. Expired sessions are reported as absent.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Inserts or replaces a session.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Removes a session. Removing an unknown session is not an error.
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
