//! File and storage endpoints
//!
//! Remote paths are `/storage/<device>/...`; the DWS serves the same tree
//! under `/files/<device>/...`.

use super::{segment, BrightSignClient};
use anyhow::{bail, Context, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{FileListing, Method, MultipartForm, RequestBody, StoragePath, UploadReply};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Outcome of a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub remote: String,
    pub local: String,
    pub bytes: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameRequest<'a> {
    old_name: &'a str,
    new_name: &'a str,
}

fn require_file_name(path: &StoragePath) -> Result<&str> {
    path.file_name().ok_or_else(|| {
        DwsError::InvalidPath {
            path: path.to_string(),
            reason: "expected a file or directory name, not a device root".to_string(),
        }
        .into()
    })
}

impl BrightSignClient {
    /// List a directory, or describe a single file.
    ///
    /// `raw` asks the player for its unformatted listing.
    pub async fn list_files(&self, path: &StoragePath, raw: bool) -> Result<FileListing> {
        let mut api_path = path.api_path();
        if raw {
            api_path.push_str("?raw");
        }
        self.get_result(&api_path).await
    }

    /// Upload a local file into the directory of `remote`.
    ///
    /// The file is read into memory up front so the body can be resent
    /// after the Digest challenge. The name on the player is the last
    /// segment of `remote`.
    pub async fn upload_file(&self, local: &Path, remote: &StoragePath) -> Result<UploadReply> {
        let name = require_file_name(remote)?;
        let body = MultipartForm::new()
            .file_from_path("file", name, local)
            .with_context(|| format!("Failed to read {}", local.display()))?
            .into_body();
        debug!(local = %local.display(), %remote, size = body.len(), "uploading file");

        let reply: UploadReply = {
            let response = self
                .request(Method::Put, &remote.api_dir_path(), body)
                .await?;
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse upload reply for {}", remote))?
        };

        if let Some(outcome) = reply.outcome() {
            if !outcome.success {
                bail!(DwsError::UnexpectedResponse(format!(
                    "upload of {} rejected: {}",
                    remote, outcome.message
                )));
            }
        }
        Ok(reply)
    }

    /// Stream a remote file to `local`
    pub async fn download_file(&self, remote: &StoragePath, local: &Path) -> Result<DownloadSummary> {
        require_file_name(remote)?;
        let path = format!("{}?contents&stream", remote.api_path());
        let mut response = self.request(Method::Get, &path, RequestBody::Empty).await?;

        let mut file = tokio::fs::File::create(local)
            .await
            .with_context(|| format!("Failed to create {}", local.display()))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", local.display()))?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(%remote, local = %local.display(), bytes = written, "download complete");
        Ok(DownloadSummary {
            remote: remote.to_string(),
            local: local.display().to_string(),
            bytes: written,
        })
    }

    /// Delete a file or directory
    pub async fn delete_file(&self, path: &StoragePath) -> Result<()> {
        require_file_name(path)?;
        self.send_unit(Method::Delete, &path.api_path(), RequestBody::Empty)
            .await
    }

    /// Rename an entry within its directory
    pub async fn rename_file(&self, path: &StoragePath, new_name: &str) -> Result<()> {
        let old_name = require_file_name(path)?;
        if new_name.is_empty() || new_name.contains('/') {
            bail!(DwsError::InvalidInput(format!(
                "new name must be a plain file name: '{}'",
                new_name
            )));
        }

        let body = RequestBody::json(&RenameRequest { old_name, new_name })?;
        self.send_unit(Method::Post, &path.api_dir_path(), body).await
    }

    /// Create a directory; `path` names the new directory
    pub async fn create_directory(&self, path: &StoragePath) -> Result<()> {
        let name = require_file_name(path)?;
        let body = MultipartForm::new().text("directory", name).into_body();
        self.send_unit(Method::Put, &path.api_dir_path(), body).await
    }

    /// Erase a storage device
    pub async fn format_storage(&self, device: &str) -> Result<()> {
        let path = format!("/storage/{}/", segment(device));
        self.send_unit(Method::Delete, &path, RequestBody::Empty).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::client_for;
    use crate::test_utils::{multipart_parts, MockDws};
    use brightsign_core::StoragePath;
    use std::io::Write;

    #[tokio::test]
    async fn test_list_files() {
        let (server, client) = client_for(MockDws::new()).await;

        let listing = client
            .list_files(&StoragePath::parse("/storage/sd/").unwrap(), false)
            .await
            .unwrap();
        let entries = listing.into_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "autorun.brs");
        assert_eq!(server.requests()[0].uri, "/api/v1/files/sd/");
    }

    #[tokio::test]
    async fn test_upload_replays_identical_multipart_body() {
        let (server, client) = client_for(MockDws::new()).await;

        let mut local = tempfile::NamedTempFile::new().unwrap();
        local.write_all(b"Sub Main()\r\nEnd Sub\r\n").unwrap();

        let reply = client
            .upload_file(
                local.path(),
                &StoragePath::parse("/storage/sd/media/main.brs").unwrap(),
            )
            .await
            .unwrap();
        assert!(reply.outcome().unwrap().success);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].uri, "/api/v1/files/sd/media/");
        assert_eq!(requests[0].body, requests[1].body);
        assert_eq!(requests[0].content_type, requests[1].content_type);

        let boundary = requests[1]
            .content_type
            .as_deref()
            .and_then(|ct| ct.split_once("boundary="))
            .map(|(_, b)| b.to_string())
            .unwrap();
        let parts = multipart_parts(&requests[1].body, &boundary);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].filename.as_deref(), Some("main.brs"));
        assert_eq!(&parts[0].data[..], b"Sub Main()\r\nEnd Sub\r\n");

        assert!(server
            .state()
            .files
            .lock()
            .unwrap()
            .contains_key("sd/media/main.brs"));
    }

    #[tokio::test]
    async fn test_download_streams_to_disk() {
        let (_server, client) = client_for(MockDws::new()).await;
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("autorun.brs");

        let summary = client
            .download_file(&StoragePath::parse("/storage/sd/autorun.brs").unwrap(), &local)
            .await
            .unwrap();

        assert_eq!(summary.bytes, 13);
        assert_eq!(std::fs::read(&local).unwrap(), b"print \"hello\"");
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let (server, client) = client_for(MockDws::new()).await;
        let path = StoragePath::parse("/storage/sd/autorun.brs").unwrap();

        client.rename_file(&path, "autorun.bak").await.unwrap();
        assert!(server.state().files.lock().unwrap().contains_key("sd/autorun.bak"));

        assert!(client.rename_file(&path, "a/b").await.is_err());

        client
            .delete_file(&StoragePath::parse("/storage/sd/autorun.bak").unwrap())
            .await
            .unwrap();
        assert!(server.state().files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_directory() {
        let (server, client) = client_for(MockDws::new()).await;

        client
            .create_directory(&StoragePath::parse("/storage/sd/media").unwrap())
            .await
            .unwrap();

        assert!(server
            .state()
            .directories
            .lock()
            .unwrap()
            .contains("sd/media"));
        let listing = client
            .list_files(&StoragePath::parse("/storage/sd/").unwrap(), false)
            .await
            .unwrap()
            .into_entries()
            .unwrap();
        assert!(listing.iter().any(|f| f.name == "media" && f.is_directory()));
    }

    #[tokio::test]
    async fn test_device_root_is_not_a_file() {
        let (server, client) = client_for(MockDws::new()).await;

        assert!(client
            .delete_file(&StoragePath::parse("/storage/sd/").unwrap())
            .await
            .is_err());
        assert_eq!(server.request_count(), 0);
    }
}
