//! HTTP Digest authentication (RFC 2617) as spoken by the DWS
//!
//! - [`challenge`] - `WWW-Authenticate` parsing
//! - [`response`] - HA1/HA2/response computation and the `Authorization` value

pub mod challenge;
pub mod response;

pub use challenge::{parse_digest_params, Challenge, DIGEST_SCHEME};
pub use response::{
    md5_hex, CnonceSource, Credentials, DigestAuthorization, FixedCnonce, NonceState,
    ThreadRngCnonce, NONCE_COUNT,
};
