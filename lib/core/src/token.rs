//! Random opaque tokens.
//!
//! Tokens are drawn from the operating system CSPRNG and encoded as
//! unpadded base64url, so they can be placed in a query parameter or a
//! cookie without further escaping.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fmt;

/// Number of random bytes in every generated token.
pub const TOKEN_BYTES: usize = 32;

/// The operating system could not provide entropy.
///
/// There is no fallback: callers must abort the operation that needed the
/// token rather than continue with a predictable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyError {
    pub reason: String,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to obtain entropy: {}", self.reason)
    }
}

impl std::error::Error for EntropyError {}

/// Generates a new random token.
///
/// # Errors
///
/// Returns [`EntropyError`] if the system random source fails.
pub fn random_token() -> Result<String, EntropyError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| EntropyError {
        reason: e.to_string(),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
