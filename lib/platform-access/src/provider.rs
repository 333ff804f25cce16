//! Identity provider contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::claims::RawClaims;
use crate::error::{ExchangeError, VerificationError};

/// Tokens returned by the provider's token endpoint.
///
/// The identity token is kept in its compact serialized form until it has
/// been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub id_token: Option<String>,
}

/// Per-login secrets that must come back unchanged on the callback.
///
/// The browser carries these between the login redirect and the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Anti-forgery value echoed back by the provider as `state`.
    pub csrf_token: String,
    /// Expected `nonce` claim of the identity token.
    pub nonce: String,
    /// PKCE verifier for the code exchange.
    pub pkce_verifier: String,
}

/// Where to send the browser, and what to remember until it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub auth_state: AuthState,
}

/// The OAuth2/OIDC authorization-code flow against one provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the URL the browser is sent to for login.
    ///
    /// `csrf_token` is embedded verbatim as `state`. A fresh nonce and PKCE
    /// challenge are generated and their secrets returned in the
    /// [`AuthState`].
    fn authorization_request(&self, csrf_token: &str) -> AuthorizationRequest;

    /// Exchanges an authorization code for tokens, proving possession of the
    /// login's PKCE verifier.
    ///
    /// Not retried: a failed exchange ends the login attempt.
    async fn exchange_code(
        &self,
        code: &str,
        auth_state: &AuthState,
    ) -> Result<TokenSet, ExchangeError>;

    /// Verifies the identity token and returns its claims.
    ///
    /// No claim is returned unless signature, issuer, audience, expiry and
    /// the login's nonce all validate.
    async fn verify_id_token(
        &self,
        tokens: &TokenSet,
        auth_state: &AuthState,
    ) -> Result<RawClaims, VerificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_state_survives_cookie_encoding() {
        let state = AuthState {
            csrf_token: "csrf".to_string(),
            nonce: "nonce".to_string(),
            pkce_verifier: "verifier".to_string(),
        };
        let json = serde_json::to_string(&state).expect("serialize");
        let parsed: AuthState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, state);
    }

    #[test]
    fn auth_state_rejects_missing_fields() {
        assert!(serde_json::from_str::<AuthState>(r#"{"csrf_token":"x"}"#).is_err());
    }
}
