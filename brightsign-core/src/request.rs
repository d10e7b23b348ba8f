//! Request descriptors

use crate::body::RequestBody;
use crate::error::{DwsError, Result};
use std::fmt;
use std::str::FromStr;

/// HTTP methods used by the DWS API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = DwsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            other => Err(DwsError::InvalidInput(format!(
                "Unsupported HTTP method '{}'",
                other
            ))),
        }
    }
}

/// Everything needed to send one request, and to send it again after a
/// challenge.
///
/// `uri` is the request-URI (absolute path plus optional query) exactly as
/// it goes on the wire and into HA2. Neither it nor `method` changes between
/// the first attempt and the retry.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub uri: String,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::Get, uri)
    }

    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(Method::Put, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::Post, uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::Delete, uri)
    }

    /// Attach a body
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// `Content-Type` of the attached body, if any
    pub fn content_type(&self) -> Option<String> {
        self.body.content_type()
    }
}
