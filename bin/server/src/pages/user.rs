//! User profile page.

use axum::{Extension, response::Html};
use portico_platform_access::SessionProfile;

use super::{escape, layout};

/// Shows the logged-in user's record and the claims from their ID token.
///
/// Only reachable behind the session guard, which supplies the profile.
pub async fn user(Extension(profile): Extension<SessionProfile>) -> Html<String> {
    // A JSON object with string keys always serializes
    let claims = serde_json::to_string_pretty(&profile.claims).unwrap_or_default();

    let body = format!(
        r#"            <h1>{email}</h1>
            <dl>
                <dt>User ID</dt><dd>{user_id}</dd>
                <dt>Subject</dt><dd>{subject}</dd>
                <dt>Member since</dt><dd>{created_at}</dd>
            </dl>
            <h2>ID token claims</h2>
            <pre>{claims}</pre>
            <p><a href="/">Home</a> | <a href="/logout">Log out</a></p>"#,
        email = escape(&profile.email),
        user_id = profile.user_id,
        subject = escape(&profile.external_subject_id),
        created_at = profile.created_at.format("%Y-%m-%d %H:%M UTC"),
        claims = escape(&claims),
    );

    layout("Profile", &body)
}
