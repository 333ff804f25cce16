//! Small response and request helpers shared by the handlers.

use axum::{
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

/// A `302 Found` redirect.
///
/// axum's `Redirect::to` answers 303; the login flow redirects with 302.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Returns `scheme://host` for the request as the browser addressed it.
///
/// The scheme is taken from `X-Forwarded-Proto` when a proxy terminates TLS
/// in front of the server.
pub fn request_origin(headers: &HeaderMap) -> String {
    let scheme = match headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
    {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn found_is_302_with_location() {
        let response = found("/user");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/user");
    }

    #[test]
    fn origin_defaults_to_http() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("app.example.com"));
        assert_eq!(request_origin(&headers), "http://app.example.com");
    }

    #[test]
    fn origin_honours_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("app.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(request_origin(&headers), "https://app.example.com");
    }

    #[test]
    fn origin_without_host_header() {
        assert_eq!(request_origin(&HeaderMap::new()), "http://localhost");
    }
}
