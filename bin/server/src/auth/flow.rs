//! The post-redirect half of the login: code in, authenticated session out.

use portico_platform_access::{
    AuthState, IdentityClaims, Session, SessionId, SessionProfile, reconcile_user,
};

use super::AppState;
use crate::error::CallbackError;

/// Turns an authorization code into a saved, authenticated session.
///
/// Steps run strictly in order and stop at the first failure, so a rejected
/// token never reaches the user store and a store failure never writes a
/// session. `auth_state` carries the PKCE verifier and nonce issued with the
/// login redirect.
///
/// The authenticated session always gets a fresh ID. `previous` is the
/// session the browser arrived with, if any; it is destroyed only after the
/// new session is stored, so a failed save leaves the browser's existing
/// session intact.
pub async fn establish_session(
    state: &AppState,
    code: &str,
    auth_state: &AuthState,
    previous: Option<&SessionId>,
) -> Result<Session, CallbackError> {
    if code.is_empty() {
        return Err(CallbackError::MissingCode);
    }

    let tokens = state
        .identity_provider
        .exchange_code(code, auth_state)
        .await
        .map_err(CallbackError::Exchange)?;

    let raw_claims = state
        .identity_provider
        .verify_id_token(&tokens, auth_state)
        .await
        .map_err(CallbackError::Verification)?;
    tracing::debug!(claims = ?raw_claims, "Verified ID token");

    let claims = IdentityClaims::try_from(raw_claims).map_err(CallbackError::Claims)?;

    let reconciled = reconcile_user(state.users.as_ref(), &claims)
        .await
        .map_err(CallbackError::Database)?;

    let session_id = SessionId::generate().map_err(CallbackError::Entropy)?;
    let mut session = Session::new(session_id, state.session_config.duration());
    session.set_profile(SessionProfile::new(&reconciled.user, claims.raw().clone()));

    state
        .sessions
        .save(&session)
        .await
        .map_err(CallbackError::Session)?;

    // The browser's cookie is replaced either way; a stale row expires on its own.
    if let Some(previous) = previous {
        if let Err(e) = state.sessions.destroy(previous).await {
            tracing::warn!(error = %e, "Failed to destroy previous session");
        }
    }

    tracing::info!(
        user_id = %reconciled.user.id(),
        is_new_user = reconciled.is_new_user,
        "Login completed"
    );

    Ok(session)
}
