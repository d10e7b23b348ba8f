//! Replayable request bodies
//!
//! A body may have to go out twice: once unauthenticated, and again after a
//! 401 challenge. Everything that can be replayed is held fully in memory as
//! [`Bytes`], so the retry sends the identical byte sequence without touching
//! the original source again.

use crate::error::{DwsError, Result};
use bytes::Bytes;
use rand::RngCore;
use serde::Serialize;
use std::path::Path;

/// Content type for JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body attached to a DWS request
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body and no content type
    #[default]
    Empty,
    /// Serialized JSON document
    Json(Bytes),
    /// Fully materialized multipart/form-data document
    Multipart { bytes: Bytes, boundary: String },
    /// Body that may be sent only once; `None` after it has been consumed
    OneShot {
        bytes: Option<Bytes>,
        content_type: String,
    },
}

impl RequestBody {
    /// Serialize `value` into a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// A body that can go out once and cannot be resent after a challenge
    pub fn one_shot(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self::OneShot {
            bytes: Some(bytes.into()),
            content_type: content_type.into(),
        }
    }

    /// `Content-Type` header value, `None` for an empty body
    pub fn content_type(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(JSON_CONTENT_TYPE.to_string()),
            Self::Multipart { boundary, .. } => {
                Some(format!("multipart/form-data; boundary={}", boundary))
            }
            Self::OneShot { content_type, .. } => Some(content_type.clone()),
        }
    }

    /// Whether the same bytes can be produced again for a retry
    pub fn is_replayable(&self) -> bool {
        !matches!(self, Self::OneShot { .. })
    }

    /// Bytes for the first attempt.
    ///
    /// A one-shot body is consumed here.
    ///
    /// # Errors
    ///
    /// Returns [`DwsError::BodyNotReplayable`] if a one-shot body was
    /// already consumed.
    pub fn payload(&mut self) -> Result<Option<Bytes>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(bytes) | Self::Multipart { bytes, .. } => Ok(Some(bytes.clone())),
            Self::OneShot { bytes, .. } => {
                bytes.take().map(Some).ok_or(DwsError::BodyNotReplayable)
            }
        }
    }

    /// Bytes for the authenticated retry, identical to the first attempt.
    ///
    /// # Errors
    ///
    /// Returns [`DwsError::BodyNotReplayable`] for a one-shot body.
    pub fn replay(&self) -> Result<Option<Bytes>> {
        match self {
            Self::Empty => Ok(None),
            Self::Json(bytes) | Self::Multipart { bytes, .. } => Ok(Some(bytes.clone())),
            Self::OneShot { .. } => Err(DwsError::BodyNotReplayable),
        }
    }

    /// Size of the body in bytes (0 once a one-shot body is consumed)
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Json(bytes) | Self::Multipart { bytes, .. } => bytes.len(),
            Self::OneShot { bytes, .. } => bytes.as_ref().map_or(0, Bytes::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder for an in-memory multipart/form-data body.
///
/// File contents are copied into the form when added, never read lazily.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    buf: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Start a form with a random boundary
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self::with_boundary(format!("{:016x}{:016x}", rng.next_u64(), rng.next_u64()))
    }

    /// Start a form with a fixed boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a plain text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape_quotes(name)
        ));
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Add a file field with the given contents
    pub fn file(mut self, name: &str, filename: &str, contents: impl AsRef<[u8]>) -> Self {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream",
            escape_quotes(name),
            escape_quotes(filename)
        ));
        self.buf.extend_from_slice(contents.as_ref());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Read the whole file at `path` into memory and add it as a file field
    pub fn file_from_path(
        self,
        name: &str,
        filename: &str,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let contents = std::fs::read(path)?;
        Ok(self.file(name, filename, contents))
    }

    /// Close the form and produce a replayable body
    pub fn into_body(mut self) -> RequestBody {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--\r\n");

        RequestBody::Multipart {
            bytes: Bytes::from(self.buf),
            boundary: self.boundary,
        }
    }

    fn open_part(&mut self, headers: &str) {
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        self.buf.extend_from_slice(headers.as_bytes());
        self.buf.extend_from_slice(b"\r\n\r\n");
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_body_replays_identical_bytes() {
        let mut body = RequestBody::json(&serde_json::json!({"value": "on"})).unwrap();

        let first = body.payload().unwrap().unwrap();
        let second = body.replay().unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(&first[..], br#"{"value":"on"}"#);
        assert_eq!(body.content_type().as_deref(), Some("application/json"));
        assert!(body.is_replayable());
    }

    #[test]
    fn test_empty_body() {
        let mut body = RequestBody::Empty;
        assert_eq!(body.payload().unwrap(), None);
        assert_eq!(body.replay().unwrap(), None);
        assert_eq!(body.content_type(), None);
        assert!(body.is_empty());
    }

    #[test]
    fn test_one_shot_body_cannot_replay() {
        let mut body = RequestBody::one_shot(&b"stream"[..], "application/octet-stream");
        assert!(!body.is_replayable());

        assert_eq!(body.payload().unwrap().unwrap(), Bytes::from_static(b"stream"));
        assert!(matches!(body.replay(), Err(DwsError::BodyNotReplayable)));
        assert!(matches!(body.payload(), Err(DwsError::BodyNotReplayable)));
        assert_eq!(body.len(), 0);
    }

    #[test]
    fn test_multipart_layout() {
        let body = MultipartForm::with_boundary("XYZ")
            .text("directory", "logs")
            .file("file", "a.txt", b"hello")
            .into_body();

        assert_eq!(
            body.content_type().as_deref(),
            Some("multipart/form-data; boundary=XYZ")
        );

        let bytes = body.replay().unwrap().unwrap();
        let expected = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"directory\"\r\n\r\n\
            logs\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n\
            hello\r\n\
            --XYZ--\r\n";
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), expected);
    }

    #[test]
    fn test_multipart_escapes_quotes_in_filename() {
        let body = MultipartForm::with_boundary("b")
            .file("file", "my \"quoted\" file.txt", b"x")
            .into_body();
        let text = String::from_utf8(body.replay().unwrap().unwrap().to_vec()).unwrap();
        assert!(text.contains(r#"filename="my \"quoted\" file.txt""#));
    }

    #[test]
    fn test_multipart_from_path_is_materialized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x00\x01binary\xff").unwrap();

        let mut body = MultipartForm::with_boundary("b")
            .file_from_path("file", "blob.bin", file.path())
            .unwrap()
            .into_body();

        // Source file changes after the form was built must not leak into the retry
        let first = body.payload().unwrap().unwrap();
        file.write_all(b"appended later").unwrap();
        let retry = body.replay().unwrap().unwrap();

        assert_eq!(first, retry);
        assert!(first
            .windows(b"\x00\x01binary\xff".len())
            .any(|w| w == b"\x00\x01binary\xff"));
        assert!(!first.windows(5).any(|w| w == b"later"));
    }

    #[test]
    fn test_multipart_from_missing_path() {
        let result = MultipartForm::new().file_from_path("file", "x", "/nonexistent/bscli/x");
        assert!(matches!(result, Err(DwsError::Io(_))));
    }

    #[test]
    fn test_random_boundaries_differ() {
        assert_ne!(MultipartForm::new().boundary(), MultipartForm::new().boundary());
    }
}
