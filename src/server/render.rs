//! Serialization of responses to wire bytes.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::error;

use crate::parser::{Failure, HttpRequest};
use crate::server::response::{HttpResponse, StatusCode};

const SERVER_ERROR_MARKER: &[u8] = b"500 Server Error";

/// A response ready to be written to the socket.
#[derive(Debug)]
pub struct Rendered {
    /// The exact bytes to send.
    pub bytes: Vec<u8>,
    /// Whether the connection closes after these bytes are sent.
    pub close: bool,
}

/// Compress `body` with gzip.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Render `response` for the client that sent `request`.
///
/// Applies `Connection: close` and gzip negotiation from the request
/// headers, then decides whether the connection stays open.
pub fn render(response: HttpResponse, request: &HttpRequest) -> Rendered {
    let mut response = response;

    if request.header("Connection") == Some("close") {
        response = response.with_header("Connection", "close");
    }

    if request
        .header("Accept-Encoding")
        .is_some_and(|encodings| encodings.contains("gzip"))
    {
        let compressed = match gzip(&response.body) {
            Ok(compressed) => compressed,
            Err(e) => {
                error!("Error compressing response body: {e}");
                return Rendered {
                    bytes: Failure::ServerError.as_bytes().to_vec(),
                    close: true,
                };
            }
        };
        response = response
            .with_header("Content-Encoding", "gzip")
            .with_body_bytes(compressed);
    }

    // A compressed 500 body no longer carries its marker text, so the status decides too.
    let server_error = response.status == StatusCode::InternalServerError;
    let bytes = response.to_bytes();
    let close = server_error
        || contains(&bytes, b"Connection: close")
        || contains(&bytes, SERVER_ERROR_MARKER);
    Rendered { bytes, close }
}
