//! Player storage paths
//!
//! Files on a player live under `/storage/<device>/...` (`sd`, `usb1`,
//! `ssd`, ...). The DWS exposes the same tree under `/files/<device>/...`.

use crate::error::{DwsError, Result};
use std::fmt;

/// Storage device assumed for relative paths
pub const DEFAULT_DEVICE: &str = "sd";

/// A parsed `/storage/<device>/...` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    device: String,
    segments: Vec<String>,
    trailing_slash: bool,
}

impl StoragePath {
    /// Parse an absolute `/storage/<device>/...` path.
    ///
    /// # Errors
    ///
    /// Returns [`DwsError::InvalidPath`] if the path does not start with
    /// `/storage/<device>` or contains `.`/`..` segments.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| DwsError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = path.split('/').filter(|part| !part.is_empty());
        if parts.next() != Some("storage") {
            return Err(invalid("expected /storage/<device>/..."));
        }
        let device = parts
            .next()
            .ok_or_else(|| invalid("missing storage device"))?
            .to_string();

        let segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.iter().any(|s| s == "." || s == "..") {
            return Err(invalid("relative segments are not allowed"));
        }

        Ok(Self {
            device,
            segments,
            trailing_slash: path.ends_with('/'),
        })
    }

    /// Resolve user input: absolute paths are parsed as-is, anything else is
    /// taken relative to `/storage/sd/`.
    pub fn resolve(path: &str) -> Result<Self> {
        if path.starts_with('/') {
            Self::parse(path)
        } else {
            Self::parse(&format!("/storage/{}/{}", DEFAULT_DEVICE, path))
        }
    }

    /// Root directory of a storage device
    pub fn device_root(device: &str) -> Result<Self> {
        Self::parse(&format!("/storage/{}/", device))
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Last segment, `None` for a device root
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Containing directory (the device root for root-level entries)
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self {
            device: self.device.clone(),
            segments,
            trailing_slash: true,
        }
    }

    /// A file directly under the device root
    pub fn is_root_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// API path of this entry: `/files/<device>/a/b`, with a trailing slash
    /// for device roots and for paths given with one
    pub fn api_path(&self) -> String {
        let mut path = format!("/files/{}", self.device);
        for segment in &self.segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        if self.segments.is_empty() || self.trailing_slash {
            path.push('/');
        }
        path
    }

    /// API path of the containing directory, always with a trailing slash
    pub fn api_dir_path(&self) -> String {
        self.parent().api_path()
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/storage/{}", self.device)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        if self.segments.is_empty() || self.trailing_slash {
            f.write_str("/")?;
        }
        Ok(())
    }
}
