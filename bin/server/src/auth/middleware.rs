//! Session extractor and the guard for protected routes.

use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use portico_platform_access::{Session, SessionId};
use std::sync::Arc;

use super::AppState;
use crate::server_helpers::found;

/// Extractor for the current session, if any.
///
/// A missing cookie, an unknown or expired session and a failing session
/// store all come out as `None`.
pub struct OptionalSession(pub Option<Session>);

impl<S> FromRequestParts<S> for OptionalSession
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        Ok(OptionalSession(load_session(&app_state, &parts.headers).await))
    }
}

/// Reads the session named by the request's session cookie.
pub(crate) async fn load_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let jar = CookieJar::from_headers(headers);
    let cookie = jar.get(&state.session_config.cookie_name)?;
    let session_id = SessionId::new(cookie.value().to_string());

    match state.sessions.find(&session_id).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load session");
            None
        }
    }
}

/// Lets a request through only when its session carries a login profile.
///
/// Anything else is redirected to `/` before the inner handler runs. The
/// profile is handed to the handler as an `Extension<SessionProfile>`.
pub async fn require_session(
    OptionalSession(session): OptionalSession,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(profile) = session.and_then(|s| s.profile().cloned()) else {
        tracing::debug!(path = %request.uri().path(), "No authenticated session, redirecting");
        return found("/");
    };

    request.extensions_mut().insert(profile);
    next.run(request).await
}
