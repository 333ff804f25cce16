//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`OidcConfig`](portico_platform_access::OidcConfig) for the
//! identity provider settings.

use portico_platform_access::OidcConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Directory served under `/public`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Connection pool configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// OIDC authentication configuration.
    pub oidc: OidcConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> String {
    "web/static".to_string()
}

/// Connection pool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a pooled connection, in seconds.
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,

    /// Server-side deadline for a single statement, in seconds.
    #[serde(default = "default_statement_timeout_seconds")]
    pub statement_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_seconds() -> u64 {
    5
}

fn default_statement_timeout_seconds() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout_seconds(),
            statement_timeout_seconds: default_statement_timeout_seconds(),
        }
    }
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session ID.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session duration in hours, fixed from creation.
    #[serde(default = "default_session_duration_hours")]
    pub duration_hours: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
}

fn default_cookie_name() -> String {
    "auth-session".to_string()
}

fn default_session_duration_hours() -> i64 {
    24
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            duration_hours: default_session_duration_hours(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_true(),
        }
    }
}

impl SessionConfig {
    /// Returns the session lifetime.
    ///
    /// Falls back to the default lifetime for an out-of-range value, which
    /// [`ServerConfig::validate`] rejects at load time.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.duration_hours)
            .filter(|d| *d > chrono::Duration::zero())
            .unwrap_or_else(|| chrono::Duration::hours(default_session_duration_hours()))
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`config::ConfigError::Message`] naming the offending setting.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let hours = self.session.duration_hours;
        if hours <= 0 {
            return Err(config::ConfigError::Message(format!(
                "session.duration_hours must be positive, got {hours}"
            )));
        }
        if chrono::Duration::try_hours(hours).is_none() {
            return Err(config::ConfigError::Message(format!(
                "session.duration_hours is out of range, got {hours}"
            )));
        }
        if self.session.cleanup_interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "session.cleanup_interval_seconds must be positive".to_string(),
            ));
        }
        if self.database.statement_timeout_seconds == 0 {
            return Err(config::ConfigError::Message(
                "database.statement_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default()
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/portico"),
        ("OIDC__DOMAIN", "example.auth0.com"),
        ("OIDC__CLIENT_ID", "client-id"),
        ("OIDC__CLIENT_SECRET", "client-secret"),
        ("OIDC__CALLBACK_URL", "http://localhost:3000/callback"),
    ];

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "auth-session");
        assert_eq!(config.duration(), chrono::Duration::hours(24));
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert!(config.secure_cookies);
    }

    #[test]
    fn loads_required_values_with_defaults() {
        let config = ServerConfig::from_source(env(REQUIRED)).expect("valid config");

        assert_eq!(config.database_url, "postgres://localhost/portico");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, "web/static");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.statement_timeout_seconds, 10);
        assert_eq!(config.oidc.domain(), "example.auth0.com");
        assert_eq!(config.oidc.callback_url(), "http://localhost:3000/callback");
        assert_eq!(config.session.cookie_name, "auth-session");
    }

    #[test]
    fn nested_overrides_are_applied() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION__DURATION_HOURS", "2"));
        vars.push(("SESSION__SECURE_COOKIES", "false"));
        vars.push(("DATABASE__MAX_CONNECTIONS", "12"));

        let config = ServerConfig::from_source(env(&vars)).expect("valid config");

        assert_eq!(config.session.duration(), chrono::Duration::hours(2));
        assert!(!config.session.secure_cookies);
        assert_eq!(config.database.max_connections, 12);
    }

    #[test]
    fn missing_client_secret_is_an_error() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "OIDC__CLIENT_SECRET")
            .collect();

        assert!(ServerConfig::from_source(env(&vars)).is_err());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();

        assert!(ServerConfig::from_source(env(&vars)).is_err());
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<ServerConfig, config::ConfigError> {
        let mut vars = REQUIRED.to_vec();
        vars.extend_from_slice(extra);
        ServerConfig::from_source(env(&vars))
    }

    fn assert_rejected(extra: &[(&str, &str)], setting: &str) {
        match load_with(extra) {
            Err(config::ConfigError::Message(message)) => {
                assert!(message.contains(setting), "unexpected message: {message}");
            }
            other => panic!("expected validation error for {setting}, got {other:?}"),
        }
    }

    #[test]
    fn negative_session_duration_is_rejected() {
        assert_rejected(&[("SESSION__DURATION_HOURS", "-5")], "duration_hours");
    }

    #[test]
    fn zero_session_duration_is_rejected() {
        assert_rejected(&[("SESSION__DURATION_HOURS", "0")], "duration_hours");
    }

    #[test]
    fn overflowing_session_duration_is_rejected() {
        let hours = (i64::MAX / 1000).to_string();
        assert_rejected(&[("SESSION__DURATION_HOURS", hours.as_str())], "duration_hours");
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        assert_rejected(
            &[("SESSION__CLEANUP_INTERVAL_SECONDS", "0")],
            "cleanup_interval_seconds",
        );
    }

    #[test]
    fn zero_statement_timeout_is_rejected() {
        assert_rejected(
            &[("DATABASE__STATEMENT_TIMEOUT_SECONDS", "0")],
            "statement_timeout_seconds",
        );
    }

    #[test]
    fn statement_timeout_can_be_overridden() {
        let config =
            load_with(&[("DATABASE__STATEMENT_TIMEOUT_SECONDS", "30")]).expect("valid config");
        assert_eq!(config.database.statement_timeout_seconds, 30);
    }

    #[test]
    fn year_long_session_is_accepted() {
        let config = load_with(&[("SESSION__DURATION_HOURS", "8760")]).expect("valid config");
        assert_eq!(config.session.duration(), chrono::Duration::hours(8760));
    }
}
