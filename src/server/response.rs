//! HTTP response types and utilities.

use std::collections::HashMap;

use crate::parser::HttpVersion;

/// Body of every 404 response, always sent with `Content-Length: 13`.
pub const NOT_FOUND_BODY: &str = "404 Not Found\n";

/// Body of every 500 response, always sent with `Content-Length: 16`.
///
/// Its presence in rendered output closes the connection.
pub const SERVER_ERROR_BODY: &str = "500 Server Error\r\n";

/// HTTP status codes with the reason phrases this server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    NotFound = 404,
    InternalServerError = 500,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// The numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Represents an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The protocol version on the status line
    pub version: HttpVersion,
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code and no headers.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http11,
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// The fixed 404 response.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
            .with_content_type("text/plain")
            .with_header("Content-Length", "13")
            .with_raw_body(NOT_FOUND_BODY.as_bytes().to_vec())
    }

    /// The fixed 500 response.
    pub fn server_error() -> Self {
        Self::new(StatusCode::InternalServerError)
            .with_content_type("text/plain")
            .with_header("Content-Length", "16")
            .with_raw_body(SERVER_ERROR_BODY.as_bytes().to_vec())
    }

    /// Set the status line version.
    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes, updating `Content-Length`.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        let content_length = self.body.len().to_string();
        self.with_header("Content-Length", content_length)
    }

    /// Replace the body without touching `Content-Length`.
    fn with_raw_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64 + self.body.len());

        // Add the status line
        let status_line = format!(
            "{} {} {}\r\n",
            self.version,
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        bytes.extend_from_slice(status_line.as_bytes());

        // Add the headers
        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        // Add the body
        bytes.extend_from_slice(&self.body);

        bytes
    }
}
