//! Identity token claims.
//!
//! Claims arrive from the provider as an open JSON object. Only the subject
//! is required; email is best effort and falls back to the display name and
//! finally to the subject itself.

use crate::error::ClaimsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The full, verified claim set of an identity token.
///
/// Kept verbatim so the session profile can carry every claim the provider
/// issued, including ones this crate does not interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawClaims(Map<String, Value>);

impl RawClaims {
    /// Wraps a claim map.
    #[must_use]
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Wraps a JSON value, which must be an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the claim as a string, if present and a string.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Claims interpreted for login.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaims {
    subject: String,
    email: Option<String>,
    name: Option<String>,
    raw: RawClaims,
}

impl IdentityClaims {
    /// Returns the subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the email claim, if the provider sent one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the name claim, if the provider sent one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the email to record for a new user.
    ///
    /// Falls back to the `name` claim, then to the subject.
    #[must_use]
    pub fn contact_email(&self) -> &str {
        self.email
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.subject)
    }

    /// Returns the full claim set.
    #[must_use]
    pub fn raw(&self) -> &RawClaims {
        &self.raw
    }
}

impl TryFrom<RawClaims> for IdentityClaims {
    type Error = ClaimsError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let subject = raw
            .string("sub")
            .ok_or(ClaimsError::MissingSubject)?
            .to_string();
        let email = raw.string("email").map(str::to_string);
        let name = raw.string("name").map(str::to_string);

        Ok(Self {
            subject,
            email,
            name,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Result<IdentityClaims, ClaimsError> {
        IdentityClaims::try_from(RawClaims::from_value(value).expect("object"))
    }

    #[test]
    fn email_claim_is_preferred() {
        let claims = claims(json!({
            "sub": "auth0|123",
            "email": "a@example.com",
            "name": "Alice",
        }))
        .expect("valid");

        assert_eq!(claims.subject(), "auth0|123");
        assert_eq!(claims.contact_email(), "a@example.com");
    }

    #[test]
    fn name_is_used_when_email_missing() {
        let claims = claims(json!({"sub": "auth0|123", "name": "Alice"})).expect("valid");
        assert_eq!(claims.email(), None);
        assert_eq!(claims.contact_email(), "Alice");
    }

    #[test]
    fn subject_is_last_resort() {
        let claims = claims(json!({"sub": "auth0|123"})).expect("valid");
        assert_eq!(claims.contact_email(), "auth0|123");
    }

    #[test]
    fn non_string_email_is_ignored() {
        let claims = claims(json!({"sub": "auth0|123", "email": 42, "name": "Alice"}))
            .expect("valid");
        assert_eq!(claims.contact_email(), "Alice");
    }

    #[test]
    fn missing_subject_is_rejected() {
        let err = claims(json!({"email": "a@example.com"})).unwrap_err();
        assert_eq!(err, ClaimsError::MissingSubject);
    }

    #[test]
    fn non_string_subject_is_rejected() {
        let err = claims(json!({"sub": 123})).unwrap_err();
        assert_eq!(err, ClaimsError::MissingSubject);
    }

    #[test]
    fn raw_claims_are_kept() {
        let claims = claims(json!({"sub": "auth0|123", "nickname": "al"})).expect("valid");
        assert_eq!(claims.raw().string("nickname"), Some("al"));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(RawClaims::from_value(json!(["sub"])).is_none());
    }
}
