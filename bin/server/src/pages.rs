//! Server-rendered HTML pages.
//!
//! Pages are plain strings; every interpolated value goes through
//! [`escape`] first.

pub mod home;
pub mod user;

pub use home::home;
pub use user::user;

use axum::response::Html;
use std::borrow::Cow;

/// HTML-escapes text content.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Wraps page content in the shared document shell.
pub(crate) fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8"/>
        <meta name="viewport" content="width=device-width, initial-scale=1"/>
        <title>{title}</title>
        <link rel="stylesheet" href="/public/style.css"/>
    </head>
    <body>
        <main>
{body}
        </main>
    </body>
</html>
"#,
        title = escape(title),
    ))
}
