//! File-transfer surface
//!
//! A narrower way into player storage than [`crate::client`]: only
//! root-level files, addressed as `/storage/<device>/<name>`. It shares the
//! Digest handshake with every other call by going through the same
//! [`Dispatcher`], and differs only in how paths become requests
//! ([`TransferRoute`]).

use crate::dispatch::Dispatcher;
use crate::route::{RequestStrategy, TransferRoute};
use anyhow::{bail, Context, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{
    Envelope, FileInfo, FileListing, Method, MultipartForm, RequestBody, StoragePath,
    UploadReply, UploadResult,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Listing replies come enveloped or bare depending on firmware
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingReply {
    Nested(Envelope<FileListing>),
    Direct(FileListing),
}

impl ListingReply {
    fn into_entries(self) -> Option<Vec<FileInfo>> {
        match self {
            ListingReply::Nested(envelope) => envelope.into_result().into_entries(),
            ListingReply::Direct(listing) => listing.into_entries(),
        }
    }
}

/// Upload, list and verify root-level files
#[derive(Debug, Clone)]
pub struct FileTransfer {
    dispatcher: Dispatcher,
    route: TransferRoute,
}

impl FileTransfer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            route: TransferRoute,
        }
    }

    async fn send(&self, method: Method, remote: &str, body: RequestBody) -> Result<bytes::Bytes> {
        let request = self.route.build(method, remote, body)?;
        let uri = request.uri.clone();
        let response = self
            .dispatcher
            .dispatch(request)
            .await
            .with_context(|| format!("{} {} failed", method, uri))?;

        let status = response.status().as_u16();
        let success = response.is_success();
        let body = response.bytes().await?;
        if !success {
            return Err(anyhow::Error::new(DwsError::Status {
                status,
                body: String::from_utf8_lossy(&body).trim().to_string(),
            })
            .context(format!("{} {} failed", method, uri)));
        }
        Ok(body)
    }

    /// Upload `local` as the root-level file `remote`.
    ///
    /// # Errors
    ///
    /// Fails with [`DwsError::InvalidPath`] for anything but
    /// `/storage/<device>/<name>`, and when the player's reply reports
    /// `success: false`.
    pub async fn upload_root_file(&self, local: &Path, remote: &str) -> Result<UploadResult> {
        let path = StoragePath::parse(remote)?;
        let name = match path.file_name() {
            Some(name) if path.is_root_level() => name.to_string(),
            _ => bail!(DwsError::InvalidPath {
                path: remote.to_string(),
                reason: "only root-level files can be uploaded (no subdirectories)".to_string(),
            }),
        };

        let body = MultipartForm::new()
            .file_from_path("file", &name, local)
            .with_context(|| format!("Failed to read {}", local.display()))?
            .into_body();
        debug!(local = %local.display(), remote, "uploading root-level file");

        let bytes = self.send(Method::Put, remote, body).await?;
        let reply: UploadReply = serde_json::from_slice(&bytes).map_err(|e| {
            DwsError::UnexpectedResponse(format!(
                "upload reply is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })?;

        match reply.outcome() {
            Some(result) if result.success => Ok(result.clone()),
            Some(result) => bail!(DwsError::UnexpectedResponse(format!(
                "upload failed: {} (full response: {})",
                result.message,
                String::from_utf8_lossy(&bytes)
            ))),
            None => bail!(DwsError::UnexpectedResponse(format!(
                "unrecognised upload reply: {}",
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }

    /// List the root of the device named in `path` (`/storage/<device>[/...]`)
    pub async fn list_device_files(&self, path: &str) -> Result<Vec<FileInfo>> {
        let bytes = self.send(Method::Get, path, RequestBody::Empty).await?;
        let reply: ListingReply = serde_json::from_slice(&bytes)?;

        reply.into_entries().ok_or_else(|| {
            DwsError::UnexpectedResponse(format!(
                "unrecognised listing: {}",
                String::from_utf8_lossy(&bytes)
            ))
            .into()
        })
    }

    /// Whether `path` exists in its device root; names compare
    /// case-insensitively
    pub async fn verify_file_exists(&self, path: &str) -> Result<bool> {
        let storage = StoragePath::parse(path)?;
        let Some(name) = storage.file_name() else {
            bail!(DwsError::InvalidPath {
                path: path.to_string(),
                reason: "expected /storage/<device>/<name>".to_string(),
            });
        };

        let files = self.list_device_files(path).await?;
        for file in &files {
            debug!(candidate = %file.name, wanted = name, "comparing file names");
        }
        Ok(files.iter().any(|file| file.name.eq_ignore_ascii_case(name)))
    }
}
