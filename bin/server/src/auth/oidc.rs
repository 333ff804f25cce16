//! OIDC client implementation using the openidconnect crate.

use async_trait::async_trait;
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreIdToken, CoreProviderMetadata,
};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, OAuth2TokenResponse,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use portico_platform_access::{
    AuthState, AuthorizationRequest, ExchangeError, IdentityProvider, OidcConfig, RawClaims,
    TokenSet, VerificationError,
};
use std::str::FromStr;

/// OIDC client for authenticating users against the configured provider.
pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    http_client: reqwest::Client,
    config: OidcConfig,
}

impl OidcClient {
    /// Creates a new OIDC client by discovering the provider metadata.
    pub async fn discover(config: OidcConfig) -> Result<Self, OidcError> {
        let issuer_url = IssuerUrl::new(config.issuer_url())
            .map_err(|e| OidcError::Configuration(format!("invalid issuer URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| {
                OidcError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| OidcError::Discovery(format!("failed to discover provider: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.callback_url().to_string())
            .map_err(|e| OidcError::Configuration(format!("invalid callback URL: {}", e)))?;

        let client_id = ClientId::new(config.client_id().to_string());
        let client_secret = ClientSecret::new(config.client_secret().to_string());

        Ok(Self {
            provider_metadata,
            client_id,
            client_secret,
            redirect_url,
            http_client,
            config,
        })
    }
}

#[async_trait]
impl IdentityProvider for OidcClient {
    fn authorization_request(&self, csrf_token: &str) -> AuthorizationRequest {
        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let csrf_token = csrf_token.to_string();
        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                move || CsrfToken::new(csrf_token),
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        // openid is always requested by the client itself
        for scope in self.config.scopes() {
            if scope != "openid" {
                auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
            }
        }

        let (auth_url, csrf_token, nonce) = auth_request.url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            auth_state: AuthState {
                csrf_token: csrf_token.secret().clone(),
                nonce: nonce.secret().clone(),
                pkce_verifier: pkce_verifier.secret().clone(),
            },
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        auth_state: &AuthState,
    ) -> Result<TokenSet, ExchangeError> {
        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let token_request = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| ExchangeError::Configuration {
                reason: format!("token endpoint error: {}", e),
            })?;

        let token_response = token_request
            .set_pkce_verifier(PkceCodeVerifier::new(auth_state.pkce_verifier.clone()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| ExchangeError::Request {
                reason: e.to_string(),
            })?;

        Ok(TokenSet {
            access_token: token_response.access_token().secret().clone(),
            id_token: token_response.id_token().map(|t| t.to_string()),
        })
    }

    async fn verify_id_token(
        &self,
        tokens: &TokenSet,
        auth_state: &AuthState,
    ) -> Result<RawClaims, VerificationError> {
        let raw = tokens
            .id_token
            .as_deref()
            .ok_or(VerificationError::MissingIdToken)?;

        let id_token = CoreIdToken::from_str(raw).map_err(|e| VerificationError::Malformed {
            reason: e.to_string(),
        })?;

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        );

        // Checks signature against the provider JWKS, issuer, audience, expiry
        // and the nonce sent with this login.
        let nonce = Nonce::new(auth_state.nonce.clone());
        id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| VerificationError::Rejected {
                reason: e.to_string(),
            })?;

        decode_payload(raw)
    }
}

/// Decodes the full claim set from a compact JWT.
///
/// The typed claims returned by openidconnect only cover the standard set;
/// the session profile keeps every claim, so the payload is read directly.
/// Only call this on a token that has already been verified.
fn decode_payload(jwt: &str) -> Result<RawClaims, VerificationError> {
    use base64::Engine;

    // JWT is base64url(header).base64url(payload).signature
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(VerificationError::Malformed {
            reason: "expected three JWT segments".to_string(),
        });
    }

    let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| VerificationError::Malformed {
            reason: format!("failed to decode JWT payload: {}", e),
        })?;

    let payload: serde_json::Value =
        serde_json::from_slice(&payload_bytes).map_err(|e| VerificationError::Malformed {
            reason: format!("failed to parse JWT payload: {}", e),
        })?;

    RawClaims::from_value(payload).ok_or_else(|| VerificationError::Malformed {
        reason: "JWT payload is not an object".to_string(),
    })
}

/// OIDC client setup errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Failed to discover provider metadata.
    Discovery(String),
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OIDC configuration error: {}", msg),
            Self::Discovery(msg) => write!(f, "OIDC discovery error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use openidconnect::core::{
        CoreJwsSigningAlgorithm, CoreResponseType, CoreSubjectIdentifierType,
    };
    use openidconnect::{
        AuthUrl, EmptyAdditionalProviderMetadata, JsonWebKeySetUrl, ResponseTypes, TokenUrl,
    };
    use std::collections::HashMap;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("signature"),
        )
    }

    #[test]
    fn decode_payload_keeps_all_claims() {
        let claims = decode_payload(&jwt(
            r#"{"sub":"auth0|123","email":"a@example.com","https://example.com/roles":["x"]}"#,
        ))
        .expect("decodes");

        assert_eq!(claims.string("sub"), Some("auth0|123"));
        assert_eq!(claims.string("email"), Some("a@example.com"));
        assert!(claims.as_map().contains_key("https://example.com/roles"));
    }

    #[test]
    fn decode_payload_rejects_wrong_segment_count() {
        let err = decode_payload("header.payload").unwrap_err();
        assert!(matches!(err, VerificationError::Malformed { .. }));
    }

    #[test]
    fn decode_payload_rejects_non_object_payload() {
        let err = decode_payload(&jwt(r#"["sub"]"#)).unwrap_err();
        assert!(matches!(err, VerificationError::Malformed { .. }));
    }

    #[test]
    fn decode_payload_rejects_bad_base64() {
        let err = decode_payload("a.!!!.c").unwrap_err();
        assert!(matches!(err, VerificationError::Malformed { .. }));
    }

    fn test_client() -> OidcClient {
        let provider_metadata = CoreProviderMetadata::new(
            IssuerUrl::new("https://example.auth0.com/".to_string()).unwrap(),
            AuthUrl::new("https://example.auth0.com/authorize".to_string()).unwrap(),
            JsonWebKeySetUrl::new("https://example.auth0.com/.well-known/jwks.json".to_string())
                .unwrap(),
            vec![ResponseTypes::new(vec![CoreResponseType::Code])],
            vec![CoreSubjectIdentifierType::Public],
            vec![CoreJwsSigningAlgorithm::RsaSsaPkcs1V15Sha256],
            EmptyAdditionalProviderMetadata {},
        )
        .set_token_endpoint(Some(
            TokenUrl::new("https://example.auth0.com/oauth/token".to_string()).unwrap(),
        ));
        let config = OidcConfig::new(
            "example.auth0.com".to_string(),
            "test-client".to_string(),
            "test-secret".to_string(),
            "http://app.test/callback".to_string(),
        );

        OidcClient {
            provider_metadata,
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            redirect_url: RedirectUrl::new(config.callback_url().to_string()).unwrap(),
            http_client: reqwest::Client::new(),
            config,
        }
    }

    #[test]
    fn authorization_request_binds_nonce_and_pkce() {
        let request = test_client().authorization_request("csrf-123");
        let url = openidconnect::url::Url::parse(&request.url).unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(request.auth_state.csrf_token, "csrf-123");
        assert_eq!(params["state"], "csrf-123");
        assert_eq!(params["nonce"], request.auth_state.nonce);
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["redirect_uri"], "http://app.test/callback");
        assert_eq!(params["scope"], "openid profile email");

        let verifier = PkceCodeVerifier::new(request.auth_state.pkce_verifier.clone());
        let expected = PkceCodeChallenge::from_code_verifier_sha256(&verifier);
        assert_eq!(&params["code_challenge"], expected.as_str());
    }

    #[test]
    fn each_request_gets_fresh_secrets() {
        let client = test_client();
        let first = client.authorization_request("a").auth_state;
        let second = client.authorization_request("a").auth_state;
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.pkce_verifier, second.pkce_verifier);
    }

    #[tokio::test]
    async fn missing_id_token_is_rejected_before_verification() {
        let tokens = TokenSet {
            access_token: "at".to_string(),
            id_token: None,
        };
        let auth_state = test_client().authorization_request("s").auth_state;
        let err = test_client()
            .verify_id_token(&tokens, &auth_state)
            .await
            .unwrap_err();
        assert_eq!(err, VerificationError::MissingIdToken);
    }
}
