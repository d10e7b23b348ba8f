//! Test utilities for CLI testing
//!
//! Provides an in-process mock DWS: it challenges with Digest, checks the
//! `Authorization` header it gets back, records every request, and serves a
//! small in-memory player (info, registry, files, logging level).

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use brightsign_core::auth::{parse_digest_params, NONCE_COUNT};
use brightsign_core::{Challenge, Credentials, DigestAuthorization, NonceState};
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const MOCK_USER: &str = "admin";
pub const MOCK_PASSWORD: &str = "password";
pub const MOCK_REALM: &str = "BrightSign";
pub const MOCK_NONCE: &str = "abc123";
pub const MOCK_OPAQUE: &str = "xyz789";

/// How the mock answers requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMode {
    /// Challenge unauthenticated requests, accept valid digests
    Digest,
    /// Challenge every request, even with a valid digest
    AlwaysChallenge,
    /// Answer 401 with a Basic challenge
    NonDigest,
    /// Answer 401 without a WWW-Authenticate header
    NoHeader,
    /// No authentication at all
    Open,
}

/// One request as the mock saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Mock DWS state
#[derive(Debug, Clone)]
pub struct MockDwsState {
    mode: ChallengeMode,
    qop: Option<String>,
    delay: Option<Duration>,
    /// Every request received, in order
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Scripted responses keyed by (method, uri), checked before the
    /// built-in endpoints
    pub canned: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    /// Scripted redirects keyed by (method, uri): status and Location
    pub redirects: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    /// Registry sections
    pub registry: Arc<Mutex<BTreeMap<String, BTreeMap<String, String>>>>,
    /// Files keyed by `<device>/<path>`
    pub files: Arc<Mutex<BTreeMap<String, Bytes>>>,
    /// Directories keyed by `<device>/<path>`
    pub directories: Arc<Mutex<BTreeSet<String>>>,
    /// Supervisor logging level
    pub logging_level: Arc<Mutex<i64>>,
    /// Display contrast
    pub contrast: Arc<Mutex<i64>>,
    /// Video output power save
    pub power_save: Arc<Mutex<bool>>,
    /// Body of the running packet capture's start request
    pub packet_capture: Arc<Mutex<Option<Value>>>,
}

impl Default for MockDwsState {
    fn default() -> Self {
        let mut registry = BTreeMap::new();
        let mut networking = BTreeMap::new();
        networking.insert("hostname".to_string(), "brightsign-test".to_string());
        registry.insert("networking".to_string(), networking);

        let mut files = BTreeMap::new();
        files.insert(
            "sd/autorun.brs".to_string(),
            Bytes::from_static(b"print \"hello\""),
        );

        Self {
            mode: ChallengeMode::Digest,
            qop: Some("auth".to_string()),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
            canned: Arc::new(Mutex::new(HashMap::new())),
            redirects: Arc::new(Mutex::new(HashMap::new())),
            registry: Arc::new(Mutex::new(registry)),
            files: Arc::new(Mutex::new(files)),
            directories: Arc::new(Mutex::new(BTreeSet::new())),
            logging_level: Arc::new(Mutex::new(2)),
            contrast: Arc::new(Mutex::new(50)),
            power_save: Arc::new(Mutex::new(false)),
            packet_capture: Arc::new(Mutex::new(None)),
        }
    }
}

/// Mock DWS server
#[derive(Debug, Default)]
pub struct MockDws {
    state: MockDwsState,
    port: u16,
}

impl MockDws {
    /// Create a mock that challenges with `qop="auth"`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ChallengeMode) -> Self {
        self.state.mode = mode;
        self
    }

    /// Advertise a different qop, or none
    pub fn with_qop(mut self, qop: Option<&str>) -> Self {
        self.state.qop = qop.map(str::to_string);
        self
    }

    /// Sleep before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.state.delay = Some(delay);
        self
    }

    /// Answer `method uri` with `status` and `body` instead of the built-in
    /// endpoint
    pub fn respond(self, method: &str, uri: &str, status: u16, body: Value) -> Self {
        self.state.canned.lock().unwrap().insert(
            (method.to_string(), uri.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Answer `method uri` with a redirect to `location`
    pub fn redirect(self, method: &str, uri: &str, status: u16, location: &str) -> Self {
        self.state.redirects.lock().unwrap().insert(
            (method.to_string(), uri.to_string()),
            (status, location.to_string()),
        );
        self
    }

    /// Start the mock server and return the origin
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = Router::new()
            .fallback(handle)
            .with_state(self.state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let origin = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, origin))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &MockDwsState {
        &self.state
    }

    /// Snapshot of every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

fn challenge_header(state: &MockDwsState) -> String {
    let mut header = format!(
        r#"Digest realm="{}", nonce="{}""#,
        MOCK_REALM, MOCK_NONCE
    );
    if let Some(qop) = &state.qop {
        header.push_str(&format!(r#", qop="{}""#, qop));
    }
    header.push_str(&format!(r#", opaque="{}""#, MOCK_OPAQUE));
    header
}

/// Recompute the digest the client should have sent
pub fn verify_authorization(
    header: &str,
    method: &str,
    uri: &str,
    qop: Option<&str>,
) -> bool {
    let Ok(params) = parse_digest_params(header) else {
        return false;
    };

    let field = |name: &str| params.get(name).map(String::as_str);
    if field("username") != Some(MOCK_USER)
        || field("realm") != Some(MOCK_REALM)
        || field("nonce") != Some(MOCK_NONCE)
        || field("uri") != Some(uri)
        || field("opaque") != Some(MOCK_OPAQUE)
    {
        return false;
    }
    if qop.is_some() && (field("qop") != qop || field("nc") != Some(NONCE_COUNT)) {
        return false;
    }

    let challenge = Challenge {
        realm: MOCK_REALM.to_string(),
        nonce: MOCK_NONCE.to_string(),
        qop: qop.map(str::to_string),
        opaque: Some(MOCK_OPAQUE.to_string()),
    };
    let expected = DigestAuthorization::compute(
        &Credentials::new(MOCK_USER, MOCK_PASSWORD),
        method,
        uri,
        &challenge,
        NonceState::with_cnonce(field("cnonce").unwrap_or_default()),
    );

    field("response") == Some(expected.response())
}

async fn handle(State(state): State<MockDwsState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let header_value = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: parts.method.as_str().to_string(),
        uri: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string()),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    };
    state.requests.lock().unwrap().push(recorded.clone());

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let authorized = match state.mode {
        ChallengeMode::Open => true,
        ChallengeMode::AlwaysChallenge => false,
        _ => recorded.authorization.as_deref().is_some_and(|auth| {
            verify_authorization(
                auth,
                &recorded.method,
                &recorded.uri,
                state.qop.as_deref(),
            )
        }),
    };

    if !authorized {
        return match state.mode {
            ChallengeMode::NonDigest => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="BrightSign""#.to_string())],
                "unauthorized",
            )
                .into_response(),
            ChallengeMode::NoHeader => (StatusCode::UNAUTHORIZED, "unauthorized").into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, challenge_header(&state))],
                "unauthorized",
            )
                .into_response(),
        };
    }

    let key = (recorded.method.clone(), recorded.uri.clone());
    let redirect = state.redirects.lock().unwrap().get(&key).cloned();
    if let Some((status, location)) = redirect {
        return (
            StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND),
            [(header::LOCATION, location)],
            "",
        )
            .into_response();
    }

    let canned = state
        .canned
        .lock()
        .unwrap()
        .get(&key)
        .cloned();
    if let Some((status, body)) = canned {
        return json_response(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        );
    }

    route(&state, &recorded)
}

fn envelope(result: Value) -> Response {
    json_response(StatusCode::OK, json!({"data": {"result": result}}).to_string())
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn not_found(uri: &str) -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        json!({"error": format!("no such endpoint: {}", uri)}).to_string(),
    )
}

fn route(state: &MockDwsState, request: &RecordedRequest) -> Response {
    let (path, query) = match request.uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (request.uri.as_str(), None),
    };
    let Some(path) = path.strip_prefix("/api/v1") else {
        return not_found(&request.uri);
    };
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["info"]) => envelope(json!({
            "model": "XT1144",
            "serial": "D7E8A1000123",
            "family": "malibu",
            "bootVersion": "8.5.42",
            "fwVersion": "8.5.42",
            "uptime": "1 hour",
            "uptimeSeconds": 3600,
            "network": {
                "hostname": "brightsign-test",
                "interfaces": [{
                    "name": "eth0",
                    "type": "ethernet",
                    "proto": "dhcp",
                    "ip": "192.168.1.50",
                    "mac": "90:ac:3f:00:01:02"
                }]
            }
        })),
        ("GET", ["health"]) => envelope(json!({"status": "active", "statusTime": "2024-01-01"})),
        ("GET", ["time"]) => envelope(json!({"date": "2024-01-01", "time": "12:00:00"})),
        ("PUT", ["time"]) => envelope(json!(true)),
        ("GET", ["logs"]) => envelope(json!("boot ok\nplayback started\n")),
        ("GET", ["system", "supervisor", "logging"]) => {
            envelope(json!(state.logging_level.lock().unwrap().to_string()))
        }
        ("PUT", ["system", "supervisor", "logging"]) => {
            match serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|v| v.get("level").and_then(Value::as_i64))
            {
                Some(level) => {
                    *state.logging_level.lock().unwrap() = level;
                    envelope(json!(true))
                }
                None => json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            }
        }
        ("PUT", ["control", "reboot"]) => envelope(json!(true)),
        ("GET", ["diagnostics", "network-neighborhood"]) => envelope(json!({
            "192.168.1.1": {"mac": "00:11:22:33:44:55", "interface": "eth0"},
            "192.168.1.60": {"mac": "90:ac:3f:00:09:09", "interface": "eth0"}
        })),
        ("PUT", ["diagnostics", "network-configuration", _]) => envelope(json!(true)),
        ("GET", ["diagnostics", "packet-capture"]) => {
            match &*state.packet_capture.lock().unwrap() {
                Some(config) => envelope(json!({
                    "running": true,
                    "interface": config["interface"],
                    "duration": config["duration"],
                    "bytesCaptured": 4096,
                    "outputFile": config.get("outputFile").cloned().unwrap_or(json!("/storage/sd/capture.pcap"))
                })),
                None => envelope(json!({"running": false})),
            }
        }
        ("POST", ["diagnostics", "packet-capture"]) => {
            let mut capture = state.packet_capture.lock().unwrap();
            if capture.is_some() {
                return json_response(
                    StatusCode::CONFLICT,
                    json!({"error": "capture already running"}).to_string(),
                );
            }
            match serde_json::from_slice::<Value>(&request.body) {
                Ok(config) => {
                    *capture = Some(config);
                    envelope(json!(true))
                }
                Err(_) => json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            }
        }
        ("DELETE", ["diagnostics", "packet-capture"]) => {
            match state.packet_capture.lock().unwrap().take() {
                Some(_) => envelope(json!(true)),
                None => not_found(&request.uri),
            }
        }
        ("GET", ["display-control", "contrast"]) => envelope(json!({
            "value": *state.contrast.lock().unwrap(),
            "min": 0,
            "max": 100
        })),
        ("PUT", ["display-control", "contrast"]) => {
            match serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|v| v.get("value").and_then(Value::as_i64))
            {
                Some(value) => {
                    *state.contrast.lock().unwrap() = value;
                    envelope(json!(true))
                }
                None => json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            }
        }
        ("GET", ["display-control", "info"]) => envelope(json!({
            "model": "QM55R",
            "serialNumber": "0TY3HCNM600123",
            "version": "T-KTM2AKUC-1240.3",
            "width": 3840,
            "height": 2160
        })),
        ("PUT", ["display-control", "firmware"]) => envelope(json!(true)),
        ("GET", ["video", _, "output", _, "edid"]) => envelope(json!({
            "manufacturer": "SAM",
            "product": "QM55R",
            "serialNumber": "HCNM600123",
            "weekOfManufacture": 14,
            "yearOfManufacture": 2022,
            "version": "1.3",
            "digital": true,
            "width": 121,
            "height": 68,
            "supportedModes": ["1920x1080x60p", "3840x2160x30p"]
        })),
        ("GET", ["video", _, "output", _, "power-save"]) => {
            envelope(json!({"enabled": *state.power_save.lock().unwrap()}))
        }
        ("PUT", ["video", _, "output", _, "power-save"]) => {
            match serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|v| v.get("enabled").and_then(Value::as_bool))
            {
                Some(enabled) => {
                    *state.power_save.lock().unwrap() = enabled;
                    envelope(json!(true))
                }
                None => json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            }
        }
        ("GET", ["registry"]) => envelope(json!(*state.registry.lock().unwrap())),
        ("PUT", ["registry", "flush"]) => envelope(json!(true)),
        ("GET", ["registry", section, key]) => {
            let registry = state.registry.lock().unwrap();
            match registry.get(*section).and_then(|s| s.get(*key)) {
                Some(value) => envelope(json!({ "value": value })),
                None => not_found(&request.uri),
            }
        }
        ("PUT", ["registry", section, key]) => {
            let value = serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|v| v.get("value").and_then(Value::as_str).map(str::to_string));
            match value {
                Some(value) => {
                    state
                        .registry
                        .lock()
                        .unwrap()
                        .entry(section.to_string())
                        .or_default()
                        .insert(key.to_string(), value);
                    envelope(json!(true))
                }
                None => json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            }
        }
        ("DELETE", ["registry", section, key]) => {
            let mut registry = state.registry.lock().unwrap();
            match registry.get_mut(*section).and_then(|s| s.remove(*key)) {
                Some(_) => envelope(json!(true)),
                None => not_found(&request.uri),
            }
        }
        ("DELETE", ["registry", section]) => match state.registry.lock().unwrap().remove(*section) {
            Some(_) => envelope(json!(true)),
            None => not_found(&request.uri),
        },
        (method, ["files", device, rest @ ..]) => {
            files_endpoint(state, request, method, device, rest, query)
        }
        _ => not_found(&request.uri),
    }
}

fn files_endpoint(
    state: &MockDwsState,
    request: &RecordedRequest,
    method: &str,
    device: &str,
    rest: &[&str],
    query: Option<&str>,
) -> Response {
    let key = if rest.is_empty() {
        device.to_string()
    } else {
        format!("{}/{}", device, rest.join("/"))
    };

    match method {
        "GET" if query.is_some_and(|q| q.contains("contents")) => {
            match state.files.lock().unwrap().get(&key) {
                Some(contents) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/octet-stream")],
                    Body::from(contents.clone()),
                )
                    .into_response(),
                None => not_found(&request.uri),
            }
        }
        "GET" => {
            let prefix = format!("{}/", key);
            let files = state.files.lock().unwrap();
            let directories = state.directories.lock().unwrap();

            let mut entries: Vec<Value> = directories
                .iter()
                .filter_map(|dir| dir.strip_prefix(&prefix))
                .filter(|name| !name.contains('/'))
                .map(|name| {
                    json!({"name": name, "path": format!("/storage/{}/{}", key, name), "type": "directory", "size": 0})
                })
                .collect();
            entries.extend(
                files
                    .iter()
                    .filter_map(|(path, contents)| path.strip_prefix(&prefix).map(|n| (n, contents)))
                    .filter(|(name, _)| !name.contains('/'))
                    .map(|(name, contents)| {
                        json!({"name": name, "path": format!("/storage/{}/{}", key, name), "type": "file", "size": contents.len()})
                    }),
            );
            envelope(json!({ "files": entries }))
        }
        "PUT" => {
            let Some(boundary) = request
                .content_type
                .as_deref()
                .and_then(|ct| ct.split_once("boundary="))
                .map(|(_, b)| b.to_string())
            else {
                return json_response(StatusCode::BAD_REQUEST, "{}".to_string());
            };

            let mut uploaded = Vec::new();
            for part in multipart_parts(&request.body, &boundary) {
                match (part.name.as_str(), part.filename) {
                    (_, Some(filename)) => {
                        state
                            .files
                            .lock()
                            .unwrap()
                            .insert(format!("{}/{}", key, filename), part.data);
                        uploaded.push(filename);
                    }
                    ("directory", None) => {
                        let name = String::from_utf8_lossy(&part.data).into_owned();
                        state
                            .directories
                            .lock()
                            .unwrap()
                            .insert(format!("{}/{}", key, name));
                        uploaded.push(name);
                    }
                    _ => {}
                }
            }

            envelope(json!({"success": true, "message": "Upload complete", "results": uploaded}))
        }
        "POST" => {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
            let (Some(old), Some(new)) = (
                body.get("oldName").and_then(Value::as_str),
                body.get("newName").and_then(Value::as_str),
            ) else {
                return json_response(StatusCode::BAD_REQUEST, "{}".to_string());
            };

            let mut files = state.files.lock().unwrap();
            match files.remove(&format!("{}/{}", key, old)) {
                Some(contents) => {
                    files.insert(format!("{}/{}", key, new), contents);
                    envelope(json!(true))
                }
                None => not_found(&request.uri),
            }
        }
        "DELETE" => {
            let removed = state.files.lock().unwrap().remove(&key).is_some()
                || state.directories.lock().unwrap().remove(&key);
            if removed {
                envelope(json!(true))
            } else {
                not_found(&request.uri)
            }
        }
        _ => not_found(&request.uri),
    }
}

/// One part of a multipart/form-data body
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub data: Bytes,
}

/// Split a multipart body produced by `MultipartForm`
pub fn multipart_parts(body: &[u8], boundary: &str) -> Vec<FormPart> {
    let delimiter = format!("--{}", boundary);
    let mut parts = Vec::new();

    for chunk in split_bytes(body, delimiter.as_bytes()).into_iter().skip(1) {
        if chunk.starts_with(b"--") {
            break;
        }
        let chunk = chunk.strip_prefix(b"\r\n").unwrap_or(chunk);
        let Some(split) = find(chunk, b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&chunk[..split]).into_owned();
        let data = &chunk[split + 4..];
        let data = data.strip_suffix(b"\r\n").unwrap_or(data);

        parts.push(FormPart {
            name: disposition_param(&headers, "name").unwrap_or_default(),
            filename: disposition_param(&headers, "filename"),
            data: Bytes::copy_from_slice(data),
        });
    }

    parts
}

fn disposition_param(headers: &str, param: &str) -> Option<String> {
    let needle = format!("; {}=\"", param);
    let start = headers.find(&needle)? + needle.len();
    let end = headers[start..].find('"')?;
    Some(headers[start..start + end].to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn split_bytes<'a>(mut haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    while let Some(pos) = find(haystack, needle) {
        pieces.push(&haystack[..pos]);
        haystack = &haystack[pos + needle.len()..];
    }
    pieces.push(haystack);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightsign_core::MultipartForm;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let (server, origin) = MockDws::new().start().await.unwrap();
        assert!(server.port() > 0);
        assert!(origin.starts_with("http://127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_unauthenticated_request_is_challenged() {
        let (server, origin) = MockDws::new().start().await.unwrap();

        let response = reqwest::get(format!("{}/api/v1/info/", origin))
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
        let challenge = response
            .headers()
            .get("www-authenticate")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(challenge.starts_with("Digest "));
        assert!(challenge.contains(r#"qop="auth""#));
        assert_eq!(server.request_count(), 1);
    }

    #[tokio::test]
    async fn test_open_mode_serves_endpoints() {
        let (_server, origin) = MockDws::new()
            .with_mode(ChallengeMode::Open)
            .start()
            .await
            .unwrap();

        let body: Value = reqwest::get(format!("{}/api/v1/info/", origin))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["result"]["model"], "XT1144");
    }

    #[test]
    fn test_verify_authorization() {
        let challenge = Challenge {
            realm: MOCK_REALM.to_string(),
            nonce: MOCK_NONCE.to_string(),
            qop: Some("auth".to_string()),
            opaque: Some(MOCK_OPAQUE.to_string()),
        };
        let authorization = DigestAuthorization::compute(
            &Credentials::new(MOCK_USER, MOCK_PASSWORD),
            "GET",
            "/api/v1/info/",
            &challenge,
            NonceState::with_cnonce("0a4f113b"),
        )
        .to_string();

        assert!(verify_authorization(&authorization, "GET", "/api/v1/info/", Some("auth")));
        assert!(!verify_authorization(&authorization, "PUT", "/api/v1/info/", Some("auth")));
        assert!(!verify_authorization(&authorization, "GET", "/api/v1/time/", Some("auth")));
    }

    #[test]
    fn test_multipart_parts() {
        let form = MultipartForm::with_boundary("XyZ")
            .text("directory", "media")
            .file("file", "a.txt", b"line1\r\nline2");
        let body = form.into_body();
        let bytes = body.replay().unwrap().unwrap();

        let parts = multipart_parts(&bytes, "XyZ");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "directory");
        assert_eq!(parts[0].filename, None);
        assert_eq!(&parts[0].data[..], b"media");
        assert_eq!(parts[1].name, "file");
        assert_eq!(parts[1].filename.as_deref(), Some("a.txt"));
        assert_eq!(&parts[1].data[..], b"line1\r\nline2");
    }
}
