//! Digest response calculation
//!
//! MD5 is fixed by RFC 2617 and by the DWS; it is not configurable.

use super::challenge::Challenge;
use md5::{Digest, Md5};
use rand::RngCore;
use std::fmt;

/// Nonce count sent with every `qop` response.
///
/// No challenge is ever reused across dispatch calls, so the count never
/// advances past the first use.
pub const NONCE_COUNT: &str = "00000001";

/// Lowercase hex MD5 of a string
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Username and password for one dispatch call
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client nonce and nonce count for a single authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceState {
    cnonce: String,
    nc: &'static str,
}

impl NonceState {
    /// Draw a fresh 32-bit cnonce from `rng`, rendered as 8 lowercase hex digits
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self::with_cnonce(format!("{:08x}", rng.next_u32()))
    }

    /// Use a caller-chosen cnonce
    pub fn with_cnonce(cnonce: impl Into<String>) -> Self {
        Self {
            cnonce: cnonce.into(),
            nc: NONCE_COUNT,
        }
    }

    pub fn cnonce(&self) -> &str {
        &self.cnonce
    }

    pub fn nc(&self) -> &str {
        self.nc
    }
}

/// Source of client nonces, injected into the dispatcher.
///
/// Called once per authentication attempt.
pub trait CnonceSource: Send + Sync {
    fn next_nonce(&self) -> NonceState;
}

/// Draws each cnonce from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngCnonce;

impl CnonceSource for ThreadRngCnonce {
    fn next_nonce(&self) -> NonceState {
        NonceState::generate(&mut rand::thread_rng())
    }
}

/// Always hands out the same cnonce. Intended for tests and golden vectors.
#[derive(Debug, Clone)]
pub struct FixedCnonce(pub String);

impl CnonceSource for FixedCnonce {
    fn next_nonce(&self) -> NonceState {
        NonceState::with_cnonce(self.0.clone())
    }
}

/// The computed `Authorization` header for one request.
///
/// Valid only for the exact method and request-URI it was computed with.
/// Renders with [`fmt::Display`] as the header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestAuthorization {
    username: String,
    realm: String,
    nonce: String,
    uri: String,
    response: String,
    qop: Option<(String, NonceState)>,
    opaque: Option<String>,
}

impl DigestAuthorization {
    /// Compute the digest response for `method` and `uri` against `challenge`.
    ///
    /// - HA1 = MD5(`username:realm:password`)
    /// - HA2 = MD5(`method:uri`)
    /// - with qop `auth`/`auth-int`: MD5(`HA1:nonce:nc:cnonce:qop:HA2`)
    /// - otherwise: MD5(`HA1:nonce:HA2`)
    pub fn compute(
        credentials: &Credentials,
        method: &str,
        uri: &str,
        challenge: &Challenge,
        nonce_state: NonceState,
    ) -> Self {
        let ha1 = md5_hex(&format!(
            "{}:{}:{}",
            credentials.username, challenge.realm, credentials.password
        ));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));

        let response = match challenge.qop.as_deref() {
            Some(qop) if challenge.uses_qop_digest() => md5_hex(&format!(
                "{}:{}:{}:{}:{}:{}",
                ha1,
                challenge.nonce,
                nonce_state.nc(),
                nonce_state.cnonce(),
                qop,
                ha2
            )),
            _ => md5_hex(&format!("{}:{}:{}", ha1, challenge.nonce, ha2)),
        };

        Self {
            username: credentials.username.clone(),
            realm: challenge.realm.clone(),
            nonce: challenge.nonce.clone(),
            uri: uri.to_string(),
            response,
            qop: challenge.qop.clone().map(|qop| (qop, nonce_state)),
            opaque: challenge.opaque.clone(),
        }
    }

    /// The hex digest sent as `response="..."`
    pub fn response(&self) -> &str {
        &self.response
    }

    /// The request-URI this authorization was computed for
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The cnonce sent, if the challenge carried a qop
    pub fn cnonce(&self) -> Option<&str> {
        self.qop.as_ref().map(|(_, state)| state.cnonce())
    }
}

impl fmt::Display for DigestAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", response="{}""#,
            self.username, self.realm, self.nonce, self.uri, self.response
        )?;
        if let Some((qop, state)) = &self.qop {
            write!(
                f,
                r#", qop={}, nc={}, cnonce="{}""#,
                qop,
                state.nc(),
                state.cnonce()
            )?;
        }
        if let Some(opaque) = &self.opaque {
            write!(f, r#", opaque="{}""#, opaque)?;
        }
        Ok(())
    }
}
