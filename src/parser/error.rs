//! Error types for the HTTP parser.

use thiserror::Error;

const MALFORMED_RESPONSE: &[u8] = b"HTTP/1.1 400 Bad Request: Malformed Request Error\r\nContent-Length: 34\r\nContent-Type: text/plain\r\n\r\n400 Bad Request: Malformed Request\r\n";
const PAYLOAD_TOO_LARGE_RESPONSE: &[u8] = b"HTTP/1.1 413 Payload too large\r\nContent-Length: 21\r\nContent-Type: text/plain\r\n\r\n413 Content Too Large";
const SERVER_ERROR_RESPONSE: &[u8] = b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 16\r\nContent-Type: text/plain\r\n\r\n500 Server Error\r\n";

/// Errors that can occur while reading an HTTP request off a stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The peer closed the connection before sending a request line.
    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// The request was not fully received before the read deadline.
    #[error("Timed out waiting for request")]
    Timeout,

    /// The request line is malformed (wrong shape, truncated or not UTF-8).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The request line exceeds the allowed length.
    #[error("Request line exceeds {limit} bytes")]
    RequestLineTooLong { limit: usize },

    /// The HTTP method in the request is not supported.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The HTTP version in the request is not supported.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// The request path fails percent-decoding or carries a forbidden sequence.
    #[error("Invalid HTTP path: {0}")]
    InvalidPath(String),

    /// A header line ran past the per-line cap without a line feed.
    #[error("Header line exceeds {limit} bytes")]
    HeaderLineTooLong { limit: usize },

    /// The stream ended in the middle of the header section.
    #[error("Unexpected end of header section")]
    TruncatedHeaders,

    /// A header line contains bytes outside printable ASCII.
    #[error("Header line contains non-printable bytes")]
    NonPrintableHeader,

    /// A header in the request has an invalid format.
    #[error("Invalid header format: {0}")]
    InvalidHeaderFormat(String),

    /// More header lines than allowed.
    #[error("Too many headers: {count} exceeds {limit}")]
    TooManyHeaders { count: usize, limit: usize },

    /// The combined header keys and values exceed the allowed size.
    #[error("Header section too large: {size} bytes exceeds {limit}")]
    HeaderSectionTooLarge { size: usize, limit: usize },

    /// `Content-Length` was sent more than once.
    #[error("Duplicate Content-Length header")]
    DuplicateContentLength,

    /// A required header is missing from the request.
    #[error("Required header is missing: {0}")]
    MissingHeader(&'static str),

    /// `Content-Length` is not a non-negative integer.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The declared body is larger than the server accepts.
    #[error("Content-Length {length} exceeds maximum body size {limit}")]
    PayloadTooLarge { length: u64, limit: u64 },

    /// The stream ended before the declared body was read.
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: u64, received: usize },

    /// I/O error on the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The client-visible outcome of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// 400, sent for every syntactic or size violation.
    Malformed,
    /// 413, sent when the declared body is too large.
    PayloadTooLarge,
    /// 500, sent when the request could not be read to completion.
    ServerError,
}

impl Failure {
    /// The pre-rendered response written to the client for this failure.
    ///
    /// Any request reaching the point of failure carries `HTTP/1.1` (every
    /// other version is rejected on the request line), so the status line
    /// always uses that version.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Failure::Malformed => MALFORMED_RESPONSE,
            Failure::PayloadTooLarge => PAYLOAD_TOO_LARGE_RESPONSE,
            Failure::ServerError => SERVER_ERROR_RESPONSE,
        }
    }
}

impl Error {
    /// Classify this error into the response the client receives.
    ///
    /// Returns `None` when the connection should be dropped without
    /// writing anything: the peer already went away or never finished.
    pub fn failure(&self) -> Option<Failure> {
        match self {
            Error::ConnectionClosed | Error::Timeout => None,
            Error::PayloadTooLarge { .. } => Some(Failure::PayloadTooLarge),
            Error::InvalidContentLength(_) | Error::IncompleteBody { .. } | Error::Io(_) => {
                Some(Failure::ServerError)
            }
            _ => Some(Failure::Malformed),
        }
    }
}
