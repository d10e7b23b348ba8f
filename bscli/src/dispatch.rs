//! Authenticated request dispatch
//!
//! Every DWS call goes through [`Dispatcher::dispatch`]: send once without
//! credentials, and if the player answers 401 with a Digest challenge, send
//! the same request exactly once more with an `Authorization` header.
//!
//! ```text
//! UNAUTHENTICATED_ATTEMPT --401--> AUTHENTICATED_RETRY --> done
//!          |                                 |
//!          +--- anything else --> done       +--- any status, even 401
//! ```
//!
//! Nothing is cached between calls: no nonce, no cnonce counter, no
//! credentials beyond the dispatcher itself. Concurrent calls share only the
//! connection pool.

use brightsign_core::auth::{Challenge, CnonceSource, Credentials, DigestAuthorization, ThreadRngCnonce};
use brightsign_core::error::{DwsError, Result};
use brightsign_core::{Method, RequestBody, RequestDescriptor};
use bytes::Bytes;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{redirect, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::route::RequestStrategy;

/// Default budget covering both round trips of one dispatch call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Turn a configured host into an origin (`scheme://host[:port]`).
///
/// A host that already carries `http://` or `https://` is kept as given,
/// minus trailing slashes. Otherwise `https` is used when `insecure` is set
/// and `http` when it is not.
pub fn normalize_origin(host: &str, insecure: bool) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else if insecure {
        format!("https://{}", host)
    } else {
        format!("http://{}", host)
    }
}

/// Request-URI as it appears on the wire: path plus query
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Render a transport error with its whole source chain, so TLS and DNS
/// details reach the user.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn network_error(method: Method, uri: &str, err: &reqwest::Error) -> DwsError {
    DwsError::Network(format!("{} {} failed: {}", method, uri, describe(err)))
}

/// Response returned by a dispatch call, whatever its status
#[derive(Debug)]
pub struct DwsResponse {
    inner: reqwest::Response,
}

impl DwsResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// A header value, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Read the whole body
    pub async fn bytes(self) -> Result<Bytes> {
        let url = self.inner.url().clone();
        self.inner
            .bytes()
            .await
            .map_err(|e| DwsError::Network(format!("reading body from {}: {}", url, describe(&e))))
    }

    /// Read the whole body as text
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the whole body and decode it as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Next chunk of the body, `None` at the end
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.inner
            .chunk()
            .await
            .map_err(|e| DwsError::Network(format!("reading body chunk: {}", describe(&e))))
    }
}

/// Sends requests to one player, answering Digest challenges on the way
#[derive(Clone)]
pub struct Dispatcher {
    http: Client,
    origin: String,
    credentials: Credentials,
    timeout: Duration,
    cnonce: Arc<dyn CnonceSource>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("origin", &self.origin)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher for the player at `origin`.
    ///
    /// # Arguments
    ///
    /// * `origin` - `scheme://host[:port]`, see [`normalize_origin`]
    /// * `credentials` - DWS username and password
    /// * `timeout` - budget for both round trips of one call
    /// * `accept_invalid_certs` - accept self-signed player certificates
    ///
    /// # Errors
    ///
    /// Returns [`DwsError::Network`] if the HTTP client cannot be built.
    pub fn new(
        origin: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            // 3xx responses go back to the caller as data
            .redirect(redirect::Policy::none())
            .user_agent(concat!("bscli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DwsError::Network(format!("cannot create HTTP client: {}", describe(&e))))?;

        Ok(Self {
            http,
            origin: origin.into().trim_end_matches('/').to_string(),
            credentials,
            timeout,
            cnonce: Arc::new(ThreadRngCnonce),
        })
    }

    /// Replace the cnonce source
    pub fn with_cnonce_source(mut self, source: Arc<dyn CnonceSource>) -> Self {
        self.cnonce = source;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a request with `strategy` and dispatch it
    pub async fn dispatch_with<S: RequestStrategy + ?Sized>(
        &self,
        strategy: &S,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<DwsResponse> {
        let request = strategy.build(method, path, body)?;
        self.dispatch(request).await
    }

    /// Send `request`, answering at most one Digest challenge.
    ///
    /// A 2xx or any non-401 first response is returned as-is. On a 401 the
    /// challenge is parsed, the body replayed and the request sent once more;
    /// that second response is returned whatever its status.
    ///
    /// # Errors
    ///
    /// - [`DwsError::Network`] on transport failure or when the timeout
    ///   budget runs out during either round trip
    /// - [`DwsError::AuthChallengeInvalid`] for a 401 without a usable
    ///   Digest challenge
    /// - [`DwsError::AuthSchemeUnsupported`] for a non-Digest challenge
    /// - [`DwsError::BodyNotReplayable`] if the body cannot be resent; no
    ///   retry is sent in that case
    pub async fn dispatch(&self, request: RequestDescriptor) -> Result<DwsResponse> {
        match tokio::time::timeout(self.timeout, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(DwsError::Network(format!(
                "request timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn exchange(&self, mut request: RequestDescriptor) -> Result<DwsResponse> {
        let url = Url::parse(&format!("{}{}", self.origin, request.uri)).map_err(|e| {
            DwsError::InvalidInput(format!("invalid request URI '{}': {}", request.uri, e))
        })?;
        let uri = request_uri(&url);
        let method = request.method;
        let content_type = request.content_type();

        let payload = request.body.payload()?;
        debug!(%method, %uri, body_len = payload.as_ref().map_or(0, Bytes::len), "sending request");

        let first = self
            .send(method, &url, content_type.as_deref(), payload, None)
            .await
            .map_err(|e| network_error(method, &uri, &e))?;

        if first.status() != StatusCode::UNAUTHORIZED {
            debug!(%method, %uri, status = %first.status(), "response received");
            return Ok(DwsResponse { inner: first });
        }

        let header = first
            .headers()
            .get(WWW_AUTHENTICATE)
            .map(|value| value.to_str().map(str::to_string));

        // Release the first connection before the retry goes out
        if let Err(e) = first.bytes().await {
            warn!(%uri, error = %describe(&e), "failed to drain challenge response");
        }

        let header = match header {
            None => {
                return Err(DwsError::AuthChallengeInvalid(
                    "401 response without a WWW-Authenticate header".to_string(),
                ))
            }
            Some(Err(_)) => {
                return Err(DwsError::AuthChallengeInvalid(
                    "WWW-Authenticate header is not valid UTF-8".to_string(),
                ))
            }
            Some(Ok(header)) => header,
        };

        let challenge = Challenge::parse(&header)?;
        debug!(%uri, realm = %challenge.realm, qop = ?challenge.qop, "digest challenge received");

        let replay = request.body.replay()?;
        let authorization = DigestAuthorization::compute(
            &self.credentials,
            method.as_str(),
            &uri,
            &challenge,
            self.cnonce.next_nonce(),
        );

        let retry = self
            .send(
                method,
                &url,
                content_type.as_deref(),
                replay,
                Some(authorization.to_string()),
            )
            .await
            .map_err(|e| network_error(method, &uri, &e))?;

        debug!(%method, %uri, status = %retry.status(), "authenticated response received");
        Ok(DwsResponse { inner: retry })
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        content_type: Option<&str>,
        body: Option<Bytes>,
        authorization: Option<String>,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut builder = self.http.request(to_reqwest(method), url.clone());

        if let Some(body) = body {
            if let Some(content_type) = content_type {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            builder = builder.body(body);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        builder.send().await
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}
