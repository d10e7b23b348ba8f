//! HTTP client for the BrightSign DWS REST API.
//!
//! [`BrightSignClient`] sits on top of the [`Dispatcher`]: the dispatcher
//! answers the Digest challenge, the client turns paths into endpoints,
//! checks the status and unwraps the `{"data":{"result": ...}}` envelope.
//! Endpoints are grouped by area in the submodules.

mod control;
mod diagnostics;
mod display;
mod info;
mod logs;
mod registry;
mod storage;
mod video;

use crate::dispatch::{Dispatcher, DwsResponse};
use crate::route::ApiRoute;
use anyhow::{Context, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{Envelope, Method, RequestBody};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use registry::RegistryMatch;
pub use storage::DownloadSummary;

/// Encode one path segment (registry section, key, interface name, ...)
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Client for one BrightSign player.
///
/// Cloning is cheap; clones share the dispatcher's connection pool.
///
/// # Examples
///
/// ```no_run
/// use bscli::client::BrightSignClient;
/// use bscli::dispatch::Dispatcher;
/// use brightsign_core::Credentials;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let dispatcher = Dispatcher::new(
///     "http://192.168.1.50",
///     Credentials::new("admin", "secret"),
///     Duration::from_secs(30),
///     false,
/// )?;
/// let client = BrightSignClient::new(dispatcher);
///
/// let info = client.get_info().await?;
/// println!("{}", info.to_value());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BrightSignClient {
    dispatcher: Dispatcher,
}

impl BrightSignClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Send a request on the general API surface and require a 2xx answer.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's [`DwsError`] on transport or authentication
    /// failure, or [`DwsError::Status`] for a non-2xx response, with the
    /// endpoint as context.
    pub async fn request(&self, method: Method, path: &str, body: RequestBody) -> Result<DwsResponse> {
        let response = self
            .dispatcher
            .dispatch_with(&ApiRoute, method, path, body)
            .await
            .with_context(|| format!("{} {} failed", method, path))?;

        ensure_success(response, method, path).await
    }

    /// GET `path` and decode the envelope's result
    pub(crate) async fn get_result<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::Get, path, RequestBody::Empty).await?;
        decode_result(response, path).await
    }

    /// Send `payload` as JSON and decode the envelope's result
    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::json(payload)
            .with_context(|| format!("Failed to encode request body for {}", path))?;
        let response = self.request(method, path, body).await?;
        decode_result(response, path).await
    }

    /// Send a request whose answer only needs to be a 2xx
    pub(crate) async fn send_unit(&self, method: Method, path: &str, body: RequestBody) -> Result<()> {
        let response = self.request(method, path, body).await?;
        // Drain so the connection goes back to the pool
        response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))?;
        Ok(())
    }
}

async fn ensure_success(response: DwsResponse, method: Method, path: &str) -> Result<DwsResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(anyhow::Error::new(DwsError::Status {
        status,
        body: body.trim().to_string(),
    })
    .context(format!("{} {} failed", method, path)))
}

async fn decode_result<T: DeserializeOwned>(response: DwsResponse, path: &str) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read response body from {}", path))?;

    let envelope: Envelope<T> = serde_json::from_slice(&bytes).map_err(|e| {
        anyhow::Error::new(DwsError::UnexpectedResponse(format!(
            "{}: {}",
            e,
            String::from_utf8_lossy(&bytes)
        )))
        .context(format!("Failed to parse JSON response from {}", path))
    })?;

    Ok(envelope.into_result())
}
