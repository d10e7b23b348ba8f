//! Request-building strategies
//!
//! The DWS exposes two surfaces that share the same Digest handshake but
//! differ in how a logical path becomes a request-URI. Each surface is a
//! [`RequestStrategy`]; both feed the same [`crate::dispatch::Dispatcher`].

use brightsign_core::error::{DwsError, Result};
use brightsign_core::{Method, RequestBody, RequestDescriptor, StoragePath};

/// Prefix of every DWS REST endpoint
pub const API_PREFIX: &str = "/api/v1";

/// Maps a logical path and body to a complete request
pub trait RequestStrategy: Send + Sync {
    fn build(&self, method: Method, path: &str, body: RequestBody) -> Result<RequestDescriptor>;
}

/// General API surface: `path` is relative to `/api/v1`.
///
/// A missing leading `/` is added; any query string is kept as given.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiRoute;

impl ApiRoute {
    pub fn uri(path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", API_PREFIX, path)
        } else {
            format!("{}/{}", API_PREFIX, path)
        }
    }
}

impl RequestStrategy for ApiRoute {
    fn build(&self, method: Method, path: &str, body: RequestBody) -> Result<RequestDescriptor> {
        if path.contains(char::is_whitespace) {
            return Err(DwsError::InvalidInput(format!(
                "API path must not contain whitespace: '{}'",
                path
            )));
        }
        Ok(RequestDescriptor::new(method, Self::uri(path)).with_body(body))
    }
}

/// File-transfer surface: `path` is a `/storage/<device>/...` path.
///
/// - `PUT` uploads a root-level file; the request targets the device
///   directory and the file name travels in the multipart form.
/// - `GET` lists the device root.
/// - `DELETE` removes the named entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransferRoute;

impl RequestStrategy for TransferRoute {
    fn build(&self, method: Method, path: &str, body: RequestBody) -> Result<RequestDescriptor> {
        let storage = StoragePath::parse(path)?;

        let api_path = match method {
            Method::Put => {
                if !storage.is_root_level() {
                    return Err(DwsError::InvalidPath {
                        path: path.to_string(),
                        reason: "only root-level files can be uploaded (no subdirectories)"
                            .to_string(),
                    });
                }
                storage.api_dir_path()
            }
            Method::Get => StoragePath::device_root(storage.device())?.api_path(),
            Method::Delete => storage.api_path(),
            Method::Post => {
                return Err(DwsError::InvalidInput(
                    "POST is not supported on the file-transfer surface".to_string(),
                ))
            }
        };

        Ok(RequestDescriptor::new(method, format!("{}{}", API_PREFIX, api_path)).with_body(body))
    }
}
