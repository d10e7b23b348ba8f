//! DWS response envelope and schema-flexible decoding
//!
//! Every DWS endpoint answers `{"data": {"result": ...}}`, but the shape of
//! `result` drifts between firmware versions. Instead of decoding into an
//! untyped value, each endpoint decodes into a tagged union whose last
//! variant keeps whatever came back verbatim.

use crate::types::FileInfo;
use serde::{Deserialize, Serialize};

/// The `{"data": {"result": T}}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: EnvelopeData<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeData<T> {
    pub result: T,
}

impl<T> Envelope<T> {
    pub fn new(result: T) -> Self {
        Self {
            data: EnvelopeData { result },
        }
    }

    pub fn into_result(self) -> T {
        self.data.result
    }
}

/// A result that matched the expected schema, or the raw JSON if it did not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flexible<T> {
    Typed(T),
    Raw(serde_json::Value),
}

impl<T> Flexible<T> {
    /// The typed value, if the response matched
    pub fn typed(self) -> Option<T> {
        match self {
            Flexible::Typed(value) => Some(value),
            Flexible::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Flexible::Raw(_))
    }
}

impl<T: Serialize> Flexible<T> {
    /// Re-encode as JSON regardless of which variant matched
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Flexible::Typed(value) => serde_json::to_value(value).unwrap_or_default(),
            Flexible::Raw(value) => value.clone(),
        }
    }
}

/// Directory listing shapes seen across firmware versions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileListing {
    /// `result` is an array of entries
    Entries(Vec<FileInfo>),
    /// `result` is `{"files": [...]}`
    Wrapped { files: Vec<FileInfo> },
    /// `result` describes a single file
    Single(FileInfo),
    /// Anything else
    Raw(serde_json::Value),
}

impl FileListing {
    /// Flatten to a list of entries; `None` for an unrecognised shape
    pub fn into_entries(self) -> Option<Vec<FileInfo>> {
        match self {
            FileListing::Entries(files) | FileListing::Wrapped { files } => Some(files),
            FileListing::Single(file) => Some(vec![file]),
            FileListing::Raw(_) => None,
        }
    }
}

/// Body of an upload acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Vec<String>,
}

/// Upload acknowledgement, either enveloped or bare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadReply {
    Nested(Envelope<UploadResult>),
    Direct(UploadResult),
    Raw(serde_json::Value),
}

impl UploadReply {
    /// The acknowledgement, if one could be found
    pub fn outcome(&self) -> Option<&UploadResult> {
        match self {
            UploadReply::Nested(envelope) => Some(&envelope.data.result),
            UploadReply::Direct(result) => Some(result),
            UploadReply::Raw(_) => None,
        }
    }
}
