//! Digest challenge parsing

use crate::error::{DwsError, Result};
use std::collections::HashMap;

/// Authentication scheme token expected at the start of the challenge
pub const DIGEST_SCHEME: &str = "Digest";

/// Split a `WWW-Authenticate` header into its Digest parameters.
///
/// The part after the scheme is split on commas and each part on its first
/// `=`. Keys and values are trimmed and surrounding quotes are removed from
/// values. Parts without `=` are ignored.
///
/// A quoted value that itself contains a comma (for example
/// `qop="auth,auth-int"`) is split at that comma, so only its first
/// element survives.
///
/// # Errors
///
/// Returns [`DwsError::AuthSchemeUnsupported`] if the header does not start
/// with the `Digest` scheme.
pub fn parse_digest_params(header: &str) -> Result<HashMap<String, String>> {
    let header = header.trim_start();
    let rest = match header.strip_prefix(DIGEST_SCHEME) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => {
            let scheme = header.split_whitespace().next().unwrap_or_default();
            return Err(DwsError::AuthSchemeUnsupported(scheme.to_string()));
        }
    };

    let mut params = HashMap::new();
    for part in rest.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"');
        params.insert(key.to_string(), value.to_string());
    }

    Ok(params)
}

/// A parsed Digest challenge.
///
/// Lives for exactly one authenticated retry; nothing keeps it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
}

impl Challenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// # Errors
    ///
    /// - [`DwsError::AuthSchemeUnsupported`] for a non-Digest scheme
    /// - [`DwsError::AuthChallengeInvalid`] if `realm` is missing or `nonce`
    ///   is missing or empty
    pub fn parse(header: &str) -> Result<Self> {
        let mut params = parse_digest_params(header)?;

        let realm = params
            .remove("realm")
            .ok_or_else(|| DwsError::AuthChallengeInvalid("missing realm".to_string()))?;
        let nonce = params
            .remove("nonce")
            .filter(|nonce| !nonce.is_empty())
            .ok_or_else(|| DwsError::AuthChallengeInvalid("missing nonce".to_string()))?;

        Ok(Self {
            realm,
            nonce,
            qop: params.remove("qop").filter(|v| !v.is_empty()),
            opaque: params.remove("opaque").filter(|v| !v.is_empty()),
        })
    }

    /// Whether the response must use the `qop` form of the digest
    pub fn uses_qop_digest(&self) -> bool {
        matches!(self.qop.as_deref(), Some("auth") | Some("auth-int"))
    }
}
