//! HTTP request parser.
//!
//! Turns a buffered byte stream into a validated [`HttpRequest`] or a
//! classified [`Error`]. The parser is strict: it accepts exactly `GET` and
//! `POST` over `HTTP/1.1`, and enforces fixed caps on the request line, the
//! header section and the request body.

mod error;
mod method;
mod path;
mod request;
mod version;
mod tests;

// Re-export public items
pub use error::{Error, Failure};
pub use method::Method;
pub use path::{percent_decode, validate_path};
pub use request::{read_request, HttpRequest};
pub use version::HttpVersion;

/// Maximum length of the raw request line, line terminator included.
pub const MAX_REQUEST_LINE_LEN: usize = 128;

/// Maximum length of a single header line, line terminator included.
pub const MAX_HEADER_LINE_LEN: usize = 512;

/// Maximum number of header lines in one request.
pub const MAX_HEADER_COUNT: usize = 50;

/// Maximum combined size of all header keys and values.
pub const MAX_HEADER_BYTES: usize = 1024;

/// Maximum accepted `Content-Length` for a request body.
pub const MAX_BODY_LEN: u64 = 1_048_576;
