//! Home page.

use axum::response::Html;

use super::{escape, layout};
use crate::auth::OptionalSession;

/// The home page: a login link, or a greeting for a logged-in user.
pub async fn home(OptionalSession(session): OptionalSession) -> Html<String> {
    let profile = session.as_ref().and_then(|s| s.profile());

    let body = match profile {
        Some(profile) => format!(
            r#"            <h1>Welcome, {}!</h1>
            <p><a href="/user">Your profile</a></p>
            <p><a href="/logout" class="cta-button">Log out</a></p>"#,
            escape(&profile.email)
        ),
        None => r#"            <h1>portico</h1>
            <p>Please log in to continue.</p>
            <a href="/login" class="cta-button">Log in</a>"#
            .to_string(),
    };

    layout("portico", &body)
}
