//! Authentication routes for login, callback, and logout.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use openidconnect::url::Url;
use portico_core::random_token;
use portico_platform_access::{AuthState, SessionId};
use serde::Deserialize;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{AppState, flow};
use crate::error::{CallbackError, LoginError, LogoutError};
use crate::server_helpers::{found, request_origin};

/// Auth state cookie name.
///
/// Holds the JSON-encoded [`AuthState`] between the login redirect and the
/// callback.
pub const AUTH_STATE_COOKIE: &str = "auth-state";

/// Query parameters for the OIDC callback.
///
/// Both are optional here so that a missing `code` is answered with the
/// callback's own 400 rather than a query rejection.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// Initiates the OIDC login flow by redirecting to the identity provider.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), LoginError> {
    let csrf_token = random_token().map_err(LoginError::Entropy)?;
    let request = state.identity_provider.authorization_request(&csrf_token);

    let auth_state_json =
        serde_json::to_string(&request.auth_state).map_err(LoginError::AuthState)?;

    let cookie = Cookie::build((AUTH_STATE_COOKIE, auth_state_json))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    Ok((jar.add(cookie), found(&request.url)))
}

/// Handles the OIDC callback after the user authenticates with the identity provider.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), CallbackError> {
    let code = query.code.as_deref().unwrap_or_default();
    if code.is_empty() {
        return Err(CallbackError::MissingCode);
    }

    let auth_state: AuthState = jar
        .get(AUTH_STATE_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .ok_or(CallbackError::StateMismatch)?;

    if query.state.as_deref() != Some(auth_state.csrf_token.as_str()) {
        return Err(CallbackError::StateMismatch);
    }

    let previous = jar
        .get(&state.session_config.cookie_name)
        .map(|c| SessionId::new(c.value().to_string()));

    let session = flow::establish_session(&state, code, &auth_state, previous.as_ref()).await?;

    let session_cookie = Cookie::build((
        state.session_config.cookie_name.clone(),
        session.id().as_str().to_string(),
    ))
    .path("/")
    .http_only(true)
    .secure(state.session_config.secure_cookies)
    .same_site(SameSite::Lax)
    .max_age(TimeDuration::hours(state.session_config.duration_hours));

    // Remove auth state cookie
    let remove_auth_state = Cookie::build((AUTH_STATE_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    let jar = jar.add(session_cookie).add(remove_auth_state);

    Ok((jar, found("/user")))
}

/// Logs out the user and sends the browser to the provider's logout endpoint.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), LogoutError> {
    let cookie_name = state.session_config.cookie_name.clone();

    if let Some(session_cookie) = jar.get(&cookie_name) {
        let session_id = SessionId::new(session_cookie.value().to_string());
        state
            .sessions
            .destroy(&session_id)
            .await
            .map_err(LogoutError::Session)?;
        tracing::info!("Session destroyed");
    }

    let return_to = request_origin(&headers);
    let logout_url = Url::parse_with_params(
        &state.oidc_config.logout_endpoint(),
        &[
            ("returnTo", return_to.as_str()),
            ("client_id", state.oidc_config.client_id()),
        ],
    )
    .map_err(|e| LogoutError::InvalidLogoutUrl {
        reason: e.to_string(),
    })?;

    // Remove session cookie
    let remove_session = Cookie::build((cookie_name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    Ok((
        jar.add(remove_session),
        Redirect::temporary(logout_url.as_str()),
    ))
}
