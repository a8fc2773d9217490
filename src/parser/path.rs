//! Request path decoding and validation.

use crate::parser::error::Error;

/// Sequences that may not appear anywhere in a decoded request path.
const FORBIDDEN_SEQUENCES: [&[u8]; 5] = [b"..", b"//", b"http://", b"https://", b"\0"];

/// Decode `%XX` escapes in a URL path.
///
/// Every `%` must be followed by two hex digits. The result is raw bytes,
/// since an escape may decode to anything, including invalid UTF-8.
pub fn percent_decode(path: &str) -> Option<Vec<u8>> {
    let bytes = path.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).copied().and_then(hex_value)?;
            let lo = bytes.get(i + 2).copied().and_then(hex_value)?;
            decoded.push(hi << 4 | lo);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    Some(decoded)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Reject paths that fail to decode or that could escape the file root.
///
/// Checks run against the decoded form so `%2e%2e` is caught like `..`.
pub fn validate_path(path: &str) -> Result<(), Error> {
    let decoded = percent_decode(path).ok_or_else(|| Error::InvalidPath(path.to_string()))?;
    let forbidden = FORBIDDEN_SEQUENCES
        .iter()
        .any(|needle| decoded.windows(needle.len()).any(|w| w == *needle));
    if forbidden {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(())
}
