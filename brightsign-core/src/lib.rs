//! BrightSign DWS Core Library
//!
//! Transport-free building blocks for talking to a BrightSign player's
//! Diagnostic Web Server: Digest authentication, replayable request bodies,
//! and the data types the DWS API exchanges. The HTTP dispatcher that ties
//! them together lives in the `bscli` crate.

pub mod api;
pub mod auth;
pub mod body;
pub mod error;
pub mod paths;
pub mod request;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use api::{Envelope, FileListing, Flexible, UploadReply, UploadResult};
pub use auth::{Challenge, CnonceSource, Credentials, DigestAuthorization, NonceState};
pub use body::{MultipartForm, RequestBody};
pub use error::*;
pub use paths::default_config_path;
pub use request::{Method, RequestDescriptor};
pub use storage::StoragePath;
pub use types::*;
