//! Error types for DWS client operations

use thiserror::Error;

/// Core error type for DWS operations
///
/// The first four variants are the authentication layer's failures. A server
/// status code, including a terminal second 401, is never one of these: the
/// dispatcher hands it back as ordinary response data.
#[derive(Error, Debug)]
pub enum DwsError {
    /// Connection, TLS or timeout failure. Never retried by the dispatcher.
    #[error("Network error: {0}")]
    Network(String),

    /// A challenge was sent but it is not a Digest challenge
    #[error("Unsupported authentication scheme: {0}")]
    AuthSchemeUnsupported(String),

    /// Digest challenge missing, or missing realm/nonce
    #[error("Invalid digest challenge: {0}")]
    AuthChallengeInvalid(String),

    /// The request body cannot be resent for the authenticated retry
    #[error("Request body cannot be replayed for the authenticated retry")]
    BodyNotReplayable,

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote path does not follow the /storage/<device>/... layout
    #[error("Invalid remote path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Non-2xx status, raised only by callers that interpret the response
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response decoded but did not carry what the caller expected
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for DWS operations
pub type Result<T> = std::result::Result<T, DwsError>;

impl From<serde_json::Error> for DwsError {
    fn from(err: serde_json::Error) -> Self {
        DwsError::Serialization(err.to_string())
    }
}

impl DwsError {
    /// Whether this error came from the authentication layer itself
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            DwsError::AuthSchemeUnsupported(_)
                | DwsError::AuthChallengeInvalid(_)
                | DwsError::BodyNotReplayable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DwsError = json_err.into();

        match err {
            DwsError::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DwsError = io_err.into();

        match err {
            DwsError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = DwsError::Network("connection refused".to_string());
        assert_eq!(format!("{}", err), "Network error: connection refused");

        let err = DwsError::BodyNotReplayable;
        assert_eq!(
            format!("{}", err),
            "Request body cannot be replayed for the authenticated retry"
        );

        let err = DwsError::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Request failed with status 404: not found"
        );

        let err = DwsError::InvalidPath {
            path: "/tmp/x".to_string(),
            reason: "expected /storage/<device>/...".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid remote path '/tmp/x': expected /storage/<device>/..."
        );
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(DwsError::BodyNotReplayable.is_auth_failure());
        assert!(DwsError::AuthSchemeUnsupported("Basic".into()).is_auth_failure());
        assert!(DwsError::AuthChallengeInvalid("no nonce".into()).is_auth_failure());
        assert!(!DwsError::Network("timeout".into()).is_auth_failure());
    }
}
