//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::path::validate_path;
use crate::parser::version::HttpVersion;
use crate::parser::{
    MAX_BODY_LEN, MAX_HEADER_BYTES, MAX_HEADER_COUNT, MAX_HEADER_LINE_LEN, MAX_REQUEST_LINE_LEN,
};

/// Represents a validated HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The request line as received, without its trailing CR/LF and spaces
    pub request_line: String,
    /// The HTTP method (GET or POST)
    pub method: Method,
    /// The request path, still percent-encoded
    pub path: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers, keyed exactly as received
    pub headers: HashMap<String, String>,
    /// The request body, present only when a body was read
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new HTTP request without a body.
    pub fn new(method: Method, path: impl Into<String>, headers: HashMap<String, String>) -> Self {
        let path = path.into();
        let version = HttpVersion::Http11;
        Self {
            request_line: format!("{method} {path} {version}"),
            method,
            path,
            version,
            headers,
            body: None,
        }
    }

    /// Create a new HTTP request with a body.
    pub fn with_body(
        method: Method,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let mut request = Self::new(method, path, headers);
        request.body = Some(body);
        request
    }

    /// Get a header value.
    ///
    /// Header names are matched exactly as the client sent them.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// The declared `Content-Length`, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length")?.parse().ok()
    }
}

/// Read one line of at most `limit` bytes into `line`, returning the count.
///
/// The line keeps its terminator. A line without a trailing `\n` means the
/// limit or end of stream was hit first.
async fn read_limited_line<R>(reader: &mut R, limit: usize, line: &mut Vec<u8>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    (&mut *reader).take(limit as u64).read_until(b'\n', line).await
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\r' | '\n' | ' ')
}

/// Read and validate the request line.
async fn read_request_line<R>(reader: &mut R) -> Result<(String, Method, String, HttpVersion), Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::with_capacity(MAX_REQUEST_LINE_LEN + 1);
    let n = read_limited_line(reader, MAX_REQUEST_LINE_LEN + 1, &mut raw).await?;
    if n == 0 {
        return Err(Error::ConnectionClosed);
    }
    if raw.len() > MAX_REQUEST_LINE_LEN {
        warn!("Request line exceeds {MAX_REQUEST_LINE_LEN} bytes, possible attack");
        return Err(Error::RequestLineTooLong { limit: MAX_REQUEST_LINE_LEN });
    }
    if raw.last() != Some(&b'\n') {
        return Err(Error::MalformedRequestLine(String::from_utf8_lossy(&raw).into_owned()));
    }

    let line = String::from_utf8(raw)
        .map_err(|e| Error::MalformedRequestLine(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
    let request_line = line.trim_end_matches(is_line_terminator).to_string();

    let parts: Vec<&str> = request_line.split(' ').collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line));
    }

    let version = HttpVersion::from_str(parts[2])?;
    let method = Method::from_str(parts[0])?;
    let path = parts[1].to_string();
    validate_path(&path)?;

    Ok((request_line, method, path, version))
}

/// Read the header section up to and including the blank line.
async fn read_headers<R>(reader: &mut R) -> Result<HashMap<String, String>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = HashMap::new();
    let mut header_count = 0;
    let mut header_bytes = 0;
    let mut seen_content_length = false;
    let mut raw = Vec::with_capacity(MAX_HEADER_LINE_LEN);

    loop {
        if header_count > MAX_HEADER_COUNT {
            warn!("Header count {header_count} exceeds {MAX_HEADER_COUNT}, possible attack");
            return Err(Error::TooManyHeaders { count: header_count, limit: MAX_HEADER_COUNT });
        }
        if header_bytes > MAX_HEADER_BYTES {
            warn!("Header section of {header_bytes} bytes exceeds {MAX_HEADER_BYTES}, possible attack");
            return Err(Error::HeaderSectionTooLarge { size: header_bytes, limit: MAX_HEADER_BYTES });
        }

        let n = read_limited_line(reader, MAX_HEADER_LINE_LEN, &mut raw).await?;
        if raw.last() != Some(&b'\n') {
            if n == MAX_HEADER_LINE_LEN {
                return Err(Error::HeaderLineTooLong { limit: MAX_HEADER_LINE_LEN });
            }
            return Err(Error::TruncatedHeaders);
        }
        if raw == b"\r\n" || raw == b"\n" {
            break;
        }

        let line = std::str::from_utf8(&raw)
            .map_err(|_| Error::NonPrintableHeader)?
            .trim_matches(is_line_terminator);
        if !line.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return Err(Error::NonPrintableHeader);
        }

        let (key, value) = line.split_once(':').unwrap_or((line, ""));
        let key = key.trim_matches(' ');
        let value = value.trim();
        // `Host` is tolerated with an empty value.
        if key != "Host" && (key.is_empty() || value.is_empty()) {
            return Err(Error::InvalidHeaderFormat(line.to_string()));
        }

        if key == "Content-Length" {
            if seen_content_length {
                warn!("Duplicate Content-Length header, possible attack");
                return Err(Error::DuplicateContentLength);
            }
            seen_content_length = true;
        }

        header_bytes += key.len() + value.len();
        header_count += 1;
        headers.insert(key.to_string(), value.to_string());
    }

    Ok(headers)
}

/// Read exactly `Content-Length` bytes of body for a POST request.
async fn read_body<R>(reader: &mut R, headers: &HashMap<String, String>) -> Result<Vec<u8>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let declared = headers
        .get("Content-Length")
        .ok_or(Error::MissingHeader("Content-Length"))?;
    let length: u64 = declared
        .parse()
        .map_err(|_| Error::InvalidContentLength(declared.clone()))?;
    if length > MAX_BODY_LEN {
        warn!("Content-Length {length} exceeds maximum body size {MAX_BODY_LEN}");
        return Err(Error::PayloadTooLarge { length, limit: MAX_BODY_LEN });
    }

    let mut body = Vec::with_capacity(length as usize);
    (&mut *reader).take(length).read_to_end(&mut body).await?;
    debug!("Read {} of {length} body bytes", body.len());
    if (body.len() as u64) < length {
        return Err(Error::IncompleteBody { expected: length, received: body.len() });
    }
    Ok(body)
}

/// Read one HTTP request from a buffered stream.
///
/// Consumes exactly the bytes of one request, so the next call on the same
/// stream reads the following request on a keep-alive connection.
///
/// # Errors
///
/// Every violation of the request grammar or its size limits is returned
/// as an [`Error`]; [`Error::failure`] says which literal response to send.
pub async fn read_request<R>(reader: &mut R) -> Result<HttpRequest, Error>
where
    R: AsyncBufRead + Unpin,
{
    let (request_line, method, path, version) = read_request_line(reader).await?;
    let headers = read_headers(reader).await?;

    if !headers.contains_key("Host") {
        warn!("Missing required Host header");
        return Err(Error::MissingHeader("Host"));
    }

    let body = match method {
        Method::POST => Some(read_body(reader, &headers).await?),
        Method::GET => None,
    };

    Ok(HttpRequest {
        request_line,
        method,
        path,
        version,
        headers,
        body,
    })
}
