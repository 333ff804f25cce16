//! OIDC (OpenID Connect) provider configuration.
//!
//! This module provides configuration types for connecting to the external
//! identity provider used for login.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the OIDC identity provider.
///
/// The provider is addressed by its domain: the issuer is
/// `https://{domain}/` and the logout endpoint is
/// `https://{domain}/v2/logout`.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// The provider domain (e.g., "example.auth0.com").
    domain: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the OAuth2 callback (e.g., "http://localhost:3000/callback").
    callback_url: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,profile,email"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// Timeout applied to every request sent to the provider, in seconds.
    /// Default: 10
    #[serde(default = "default_http_timeout_seconds")]
    http_timeout_seconds: u64,
}

fn default_scopes() -> String {
    "openid,profile,email".to_string()
}

fn default_http_timeout_seconds() -> u64 {
    10
}

impl OidcConfig {
    /// Creates a new OIDC configuration with defaults for optional fields.
    #[must_use]
    pub fn new(
        domain: String,
        client_id: String,
        client_secret: String,
        callback_url: String,
    ) -> Self {
        Self {
            domain,
            client_id,
            client_secret,
            callback_url,
            scopes: default_scopes(),
            http_timeout_seconds: default_http_timeout_seconds(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(
        domain: String,
        client_id: String,
        client_secret: String,
        callback_url: String,
    ) -> OidcConfigBuilder {
        OidcConfigBuilder::new(domain, client_id, client_secret, callback_url)
    }

    /// Returns the provider domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the issuer URL used for discovery and token validation.
    #[must_use]
    pub fn issuer_url(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Returns the provider's logout endpoint, without query parameters.
    #[must_use]
    pub fn logout_endpoint(&self) -> String {
        format!("https://{}/v2/logout", self.domain)
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the timeout for provider requests.
    #[must_use]
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_seconds)
    }
}

impl fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("scopes", &self.scopes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

/// Builder for `OidcConfig`.
#[derive(Debug)]
pub struct OidcConfigBuilder {
    domain: String,
    client_id: String,
    client_secret: String,
    callback_url: String,
    scopes: Vec<String>,
    http_timeout_seconds: u64,
}

impl OidcConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(
        domain: String,
        client_id: String,
        client_secret: String,
        callback_url: String,
    ) -> Self {
        Self {
            domain,
            client_id,
            client_secret,
            callback_url,
            scopes: vec![
                "openid".to_string(),
                "profile".to_string(),
                "email".to_string(),
            ],
            http_timeout_seconds: default_http_timeout_seconds(),
        }
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Sets the provider request timeout.
    #[must_use]
    pub fn http_timeout_seconds(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    /// Builds the `OidcConfig`.
    #[must_use]
    pub fn build(self) -> OidcConfig {
        OidcConfig {
            domain: self.domain,
            client_id: self.client_id,
            client_secret: self.client_secret,
            callback_url: self.callback_url,
            scopes: self.scopes.join(","),
            http_timeout_seconds: self.http_timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OidcConfig {
        OidcConfig::new(
            "example.auth0.com".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://localhost:3000/callback".to_string(),
        )
    }

    #[test]
    fn new_config_has_defaults() {
        let config = sample();

        assert_eq!(config.domain(), "example.auth0.com");
        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(config.callback_url(), "http://localhost:3000/callback");
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
        assert_eq!(config.http_timeout(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn endpoints_derive_from_domain() {
        let config = sample();
        assert_eq!(config.issuer_url(), "https://example.auth0.com/");
        assert_eq!(
            config.logout_endpoint(),
            "https://example.auth0.com/v2/logout"
        );
    }

    #[test]
    fn builder_add_scope_does_not_duplicate() {
        let config = OidcConfig::builder(
            "example.auth0.com".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://localhost:3000/callback".to_string(),
        )
        .add_scope("openid".to_string())
        .add_scope("offline_access".to_string())
        .http_timeout_seconds(3)
        .build();

        let openid_count = config.scopes().iter().filter(|s| **s == "openid").count();
        assert_eq!(openid_count, 1);
        assert!(config.scopes().contains(&"offline_access"));
        assert_eq!(config.http_timeout(), std::time::Duration::from_secs(3));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "domain": "tenant.eu.auth0.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "callback_url": "https://app.example.com/callback"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.domain(), "tenant.eu.auth0.com");
        assert_eq!(config.scopes(), vec!["openid", "profile", "email"]);
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "domain": "tenant.eu.auth0.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "callback_url": "https://app.example.com/callback",
            "scopes": "openid, email,, profile"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("client-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
