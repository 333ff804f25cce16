//! Route table for the web server.

use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{self, AppState, require_session};
use crate::pages;

/// Builds the application router.
///
/// `/user` sits behind [`require_session`]; every other route is public.
/// Static assets under `static_dir` are served at `/public`.
pub fn router(state: Arc<AppState>, static_dir: &str) -> Router {
    let protected = Router::new()
        .route("/user", get(pages::user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", get(auth::logout))
        .merge(protected)
        .nest_service("/public", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
