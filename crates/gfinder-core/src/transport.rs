//! Transport seam between the client and whatever performs HTTP.
//!
//! The browser package implements [`Transport`] on the Fetch API; tests use
//! the in-memory transport from the `mock` feature. Implementations report
//! raw outcomes only. Status codes are interpreted by [`HttpClient`](crate::HttpClient).

use std::fmt;
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Request
// =============================================================================

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field
    Text { name: String, value: String },
    /// File field with its own filename and MIME type
    File {
        name: String,
        filename: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    /// Field name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Multipart form body. The boundary is left to the transport's encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            filename: filename.into(),
            content_type,
            bytes,
        });
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Look up a part by field name.
    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|p| p.name() == name)
    }
}

/// Request body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON text
    Json(String),
    Multipart(MultipartForm),
}

/// A fully resolved request, ready for a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute or origin-relative URL, query already encoded
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Upper bound the transport must enforce
    pub timeout: Duration,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The JSON body, if any.
    pub fn json(&self) -> Option<&str> {
        match &self.body {
            RequestBody::Json(text) => Some(text),
            _ => None,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Raw response as received: no status interpretation yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// 2xx, the Fetch API's `ok`.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// =============================================================================
// Transport
// =============================================================================

/// Failures that happen before a response exists.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The configured timeout elapsed first.
    #[error("request timed out")]
    TimedOut,
    /// The request went out but nothing came back.
    #[error("no response: {0}")]
    NoResponse(String),
    /// The request could not be built or dispatched.
    #[error("{0}")]
    Construction(String),
}

/// Something that can perform an HTTP exchange.
///
/// Futures are not required to be `Send`: the client runs on a
/// single-threaded executor.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
