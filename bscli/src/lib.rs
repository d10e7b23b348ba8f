//! BrightSign DWS CLI Library
//!
//! This library provides the core functionality for the `bscli` tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::BrightSignClient`], which wraps a
//! [`dispatch::Dispatcher`] that answers the player's Digest challenges.
//! Root-level uploads with their own error reporting live in
//! [`transfer::FileTransfer`]. Configuration types are available via
//! [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use brightsign_core::Credentials;
//! use bscli::client::BrightSignClient;
//! use bscli::dispatch::{normalize_origin, Dispatcher};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::new(
//!     normalize_origin("192.168.1.50", false),
//!     Credentials::new("admin", "password"),
//!     Duration::from_secs(30),
//!     false,
//! )?;
//! let client = BrightSignClient::new(dispatcher);
//!
//! let health = client.get_health().await?;
//! println!("Player status: {}", health.status);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Typed client for the DWS REST API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

/// Authenticated request dispatch.
pub mod dispatch;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Request strategies mapping calls to DWS URIs.
pub mod route;

/// Root-level file upload and verification.
pub mod transfer;

#[cfg(test)]
pub mod test_utils;
