//! HTTP-facing error types for the auth routes.
//!
//! Each variant logs its internal detail and renders a short plain-text
//! message. Nothing about the underlying cause reaches the browser.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portico_core::EntropyError;
use portico_platform_access::{
    ClaimsError, ExchangeError, SessionStoreError, UserStoreError, VerificationError,
};
use std::fmt;

/// Failures of the login redirect.
#[derive(Debug)]
pub enum LoginError {
    /// No state token could be generated.
    Entropy(EntropyError),
    /// The auth state could not be encoded into its cookie.
    AuthState(serde_json::Error),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entropy(e) => write!(f, "login failed: {e}"),
            Self::AuthState(e) => write!(f, "failed to encode auth state: {e}"),
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to start login");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to start login").into_response()
    }
}

/// Failures of the authorization callback.
#[derive(Debug)]
pub enum CallbackError {
    /// The `code` query parameter was absent or empty.
    MissingCode,
    /// The auth state cookie was missing or unreadable, or the returned
    /// `state` did not match the one issued at login.
    StateMismatch,
    /// The code could not be exchanged for tokens.
    Exchange(ExchangeError),
    /// The identity token failed verification.
    Verification(VerificationError),
    /// The verified claims had no usable subject.
    Claims(ClaimsError),
    /// The user store failed.
    Database(UserStoreError),
    /// The session store failed.
    Session(SessionStoreError),
    /// No session ID could be generated.
    Entropy(EntropyError),
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode => write!(f, "missing authorization code"),
            Self::StateMismatch => write!(f, "state does not match the issued value"),
            Self::Exchange(e) => write!(f, "{e}"),
            Self::Verification(e) => write!(f, "{e}"),
            Self::Claims(e) => write!(f, "{e}"),
            Self::Database(e) => write!(f, "{e}"),
            Self::Session(e) => write!(f, "{e}"),
            Self::Entropy(e) => write!(f, "{e}"),
        }
    }
}

impl CallbackError {
    /// Returns the status code and user-safe message for this error.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingCode => (StatusCode::BAD_REQUEST, "Missing authorization code"),
            Self::StateMismatch => (StatusCode::BAD_REQUEST, "Invalid state parameter"),
            Self::Exchange(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to exchange token"),
            Self::Verification(_) => (StatusCode::UNAUTHORIZED, "Failed to verify ID token"),
            Self::Claims(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid profile: missing sub claim",
            ),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            Self::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save session"),
            Self::Entropy(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save session"),
        }
    }
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "Callback failed");
        } else {
            tracing::warn!(error = %self, "Callback rejected");
        }
        (status, message).into_response()
    }
}

/// Failures of logout.
#[derive(Debug)]
pub enum LogoutError {
    /// The server-side session could not be destroyed.
    Session(SessionStoreError),
    /// The provider logout URL could not be built.
    InvalidLogoutUrl { reason: String },
}

impl fmt::Display for LogoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(e) => write!(f, "{e}"),
            Self::InvalidLogoutUrl { reason } => write!(f, "invalid logout URL: {reason}"),
        }
    }
}

impl IntoResponse for LogoutError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Logout failed");
        let message = match self {
            Self::Session(_) => "Failed to destroy session",
            Self::InvalidLogoutUrl { .. } => "Failed to log out",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_statuses() {
        assert_eq!(
            CallbackError::MissingCode.status_and_message().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CallbackError::Exchange(ExchangeError::Request {
                reason: "timeout".to_string()
            })
            .status_and_message()
            .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CallbackError::Claims(ClaimsError::MissingSubject)
                .status_and_message()
                .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CallbackError::Database(UserStoreError::Database {
                details: "down".to_string()
            })
            .status_and_message()
            .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn verification_failures_are_indistinguishable() {
        let reasons = [
            VerificationError::MissingIdToken,
            VerificationError::Malformed {
                reason: "not a jwt".to_string(),
            },
            VerificationError::Rejected {
                reason: "bad signature".to_string(),
            },
            VerificationError::Rejected {
                reason: "expired".to_string(),
            },
        ];

        for reason in reasons {
            assert_eq!(
                CallbackError::Verification(reason).status_and_message(),
                (StatusCode::UNAUTHORIZED, "Failed to verify ID token")
            );
        }
    }

    #[test]
    fn messages_do_not_leak_details() {
        let err = CallbackError::Database(UserStoreError::Database {
            details: "password authentication failed for user postgres".to_string(),
        });
        let (_, message) = err.status_and_message();
        assert!(!message.contains("postgres"));
    }
}
