//! Platform access for portico: who is logged in, and how they got there.
//!
//! This crate provides:
//! - User records keyed by the identity provider's subject (`User`)
//! - Server-side sessions and their profile (`Session`, `SessionProfile`)
//! - Identity token claims with their fallback rules (`IdentityClaims`)
//! - The collaborator contracts the login flow is written against
//!   (`IdentityProvider`, `UserStore`, `SessionStore`)
//! - User reconciliation on login (`reconcile_user`)
//! - In-memory stores for local development and tests
//!
//! # Example
//!
//! ```
//! use portico_platform_access::{IdentityClaims, RawClaims, Session, SessionId, SessionProfile, User};
//! use chrono::Duration;
//!
//! let raw = RawClaims::from_value(serde_json::json!({
//!     "sub": "auth0|123",
//!     "email": "a@example.com",
//! }))
//! .expect("claims object");
//! let claims = IdentityClaims::try_from(raw).expect("subject present");
//!
//! let user = User::new(claims.subject().to_string(), claims.contact_email().to_string());
//!
//! let mut session = Session::new(SessionId::new("sess_abc123".to_string()), Duration::hours(24));
//! session.set_profile(SessionProfile::new(&user, claims.raw().clone()));
//!
//! assert!(session.is_authenticated());
//! assert_eq!(session.profile().map(|p| p.user_id), Some(user.id()));
//! ```

pub mod claims;
pub mod error;
pub mod memory;
pub mod oidc;
pub mod provider;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod user;

// Re-export main types at crate root
pub use claims::{IdentityClaims, RawClaims};
pub use error::{ClaimsError, ExchangeError, SessionStoreError, UserStoreError, VerificationError};
pub use memory::{MemorySessionStore, MemoryUserStore};
pub use oidc::{OidcConfig, OidcConfigBuilder};
pub use provider::{AuthState, AuthorizationRequest, IdentityProvider, TokenSet};
pub use reconcile::{ReconciledUser, reconcile_user};
pub use session::{Session, SessionId, SessionProfile};
pub use store::{SessionStore, UserStore};
pub use user::User;
