//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use crate::parser::{
        percent_decode, read_request, validate_path, Error, Failure, HttpRequest, HttpVersion,
        Method,
    };

    async fn parse(input: &[u8]) -> Result<HttpRequest, Error> {
        let mut reader = input;
        read_request(&mut reader).await
    }

    fn many_headers(count: usize) -> Vec<u8> {
        let mut request = b"GET / HTTP/1.1\r\nHost: localhost\r\n".to_vec();
        for i in 1..count {
            request.extend_from_slice(format!("X-{i}: v\r\n").as_bytes());
        }
        request.extend_from_slice(b"\r\n");
        request
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let result = parse(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.path, "/index.html");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.request_line, "GET /index.html HTTP/1.1");
        assert_eq!(result.header("Host"), Some("example.com"));
        assert!(result.body.is_none());
    }

    #[tokio::test]
    async fn test_parse_request_with_multiple_headers() {
        let request = b"GET /user-agent HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent: curl/8.4.0\r\nAccept: */*\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.header("Host"), Some("localhost:4221"));
        assert_eq!(result.header("User-Agent"), Some("curl/8.4.0"));
        assert_eq!(result.header("Accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn test_headers_are_case_sensitive() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nuser-agent: test\r\n\r\n")
            .await
            .unwrap();
        assert!(result.has_header("user-agent"));
        assert!(!result.has_header("User-Agent"));
    }

    #[tokio::test]
    async fn test_headers_with_multiple_colons() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nX-Test: value:with:colons\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(result.header("X-Test"), Some("value:with:colons"));
    }

    #[tokio::test]
    async fn test_headers_with_surrounding_whitespace() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: example.com  \r\n User-Agent :  test  \r\n\r\n")
            .await
            .unwrap();
        assert_eq!(result.header("Host"), Some("example.com"));
        assert_eq!(result.header("User-Agent"), Some("test"));
    }

    #[tokio::test]
    async fn test_bare_line_feeds() {
        let result = parse(b"GET / HTTP/1.1\nHost: example.com\nUser-Agent: test\n\n")
            .await
            .unwrap();
        assert_eq!(result.header("User-Agent"), Some("test"));
    }

    #[tokio::test]
    async fn test_last_header_occurrence_wins() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nX-Dup: one\r\nX-Dup: two\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(result.header("X-Dup"), Some("two"));
    }

    #[tokio::test]
    async fn test_missing_host_header() {
        let result = parse(b"GET /index.html HTTP/1.1\r\nAccept: */*\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MissingHeader("Host"))));
    }

    #[tokio::test]
    async fn test_host_with_empty_value_is_tolerated() {
        let result = parse(b"GET / HTTP/1.1\r\nHost:\r\n\r\n").await.unwrap();
        assert_eq!(result.header("Host"), Some(""));
    }

    #[tokio::test]
    async fn test_empty_value_rejected_for_other_headers() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nAccept:\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(_))));
    }

    #[tokio::test]
    async fn test_invalid_header_format() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nInvalidHeader\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(_))));

        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\n: orphan\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(_))));
    }

    #[tokio::test]
    async fn test_non_printable_header() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nX-Tab: a\tb\r\n\r\n").await;
        assert!(matches!(result, Err(Error::NonPrintableHeader)));

        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nX-High: caf\xc3\xa9\r\n\r\n").await;
        assert!(matches!(result, Err(Error::NonPrintableHeader)));
    }

    #[tokio::test]
    async fn test_invalid_method() {
        let result = parse(b"PUT /index.html HTTP/1.1\r\nHost: a\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "PUT"));
    }

    #[tokio::test]
    async fn test_invalid_http_version() {
        let result = parse(b"GET /index.html HTTP/1.0\r\nHost: a\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/1.0"));
    }

    #[tokio::test]
    async fn test_request_line_token_count() {
        let requests: [&[u8]; 4] = [
            b"GET\r\nHost: a\r\n\r\n",
            b"GET /index.html\r\nHost: a\r\n\r\n",
            b"GET  /index.html HTTP/1.1\r\nHost: a\r\n\r\n",
            b"GET /index.html HTTP/1.1 extra\r\nHost: a\r\n\r\n",
        ];
        for request in requests {
            let result = parse(request).await;
            assert!(matches!(result, Err(Error::MalformedRequestLine(_))), "{request:?}");
        }
    }

    #[tokio::test]
    async fn test_request_line_length_limit() {
        // "GET /" + path + " HTTP/1.1\r\n" is 16 bytes plus the path
        let fits = format!("GET /{} HTTP/1.1\r\nHost: a\r\n\r\n", "a".repeat(112));
        assert!(parse(fits.as_bytes()).await.is_ok());

        let too_long = format!("GET /{} HTTP/1.1\r\nHost: a\r\n\r\n", "a".repeat(113));
        let result = parse(too_long.as_bytes()).await;
        assert!(matches!(result, Err(Error::RequestLineTooLong { limit: 128 })));
        assert_eq!(result.unwrap_err().failure(), Some(Failure::Malformed));
    }

    #[tokio::test]
    async fn test_truncated_request_line() {
        let result = parse(b"GET / HTTP/1.1").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[tokio::test]
    async fn test_empty_stream_closes_quietly() {
        let err = parse(b"").await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
        assert_eq!(err.failure(), None);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        for path in [
            "/files/../secret",
            "/files/%2e%2e/secret",
            "/files//etc",
            "/echo/http:%2F%2Fevil",
            "/echo/https:%2f%2fevil",
            "/files/a%00b",
            "/files/%zz",
            "/files/%4",
        ] {
            let request = format!("GET {path} HTTP/1.1\r\nHost: a\r\n\r\n");
            let result = parse(request.as_bytes()).await;
            assert!(matches!(result, Err(Error::InvalidPath(_))), "{path}");
        }
    }

    #[tokio::test]
    async fn test_encoded_path_kept_raw() {
        let result = parse(b"GET /echo/hello%20world HTTP/1.1\r\nHost: a\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(result.path, "/echo/hello%20world");
    }

    #[tokio::test]
    async fn test_header_line_too_long() {
        let request = format!("GET / HTTP/1.1\r\nHost: a\r\nX-Long: {}\r\n\r\n", "a".repeat(600));
        let result = parse(request.as_bytes()).await;
        assert!(matches!(result, Err(Error::HeaderLineTooLong { limit: 512 })));
    }

    #[tokio::test]
    async fn test_truncated_header_section() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\n").await;
        assert!(matches!(result, Err(Error::TruncatedHeaders)));
        assert_eq!(result.unwrap_err().failure(), Some(Failure::Malformed));
    }

    #[tokio::test]
    async fn test_header_count_limit() {
        assert!(parse(&many_headers(50)).await.is_ok());

        let result = parse(&many_headers(51)).await;
        assert!(matches!(result, Err(Error::TooManyHeaders { count: 51, limit: 50 })));
    }

    #[tokio::test]
    async fn test_header_section_size_limit() {
        let value = "v".repeat(400);
        let request = format!(
            "GET / HTTP/1.1\r\nHost: a\r\nX-A: {value}\r\nX-B: {value}\r\nX-C: {value}\r\n\r\n"
        );
        let result = parse(request.as_bytes()).await;
        assert!(matches!(result, Err(Error::HeaderSectionTooLarge { limit: 1024, .. })));
    }

    #[tokio::test]
    async fn test_duplicate_content_length() {
        let request = b"POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: 3\r\nContent-Length: 3\r\n\r\nabc";
        let result = parse(request).await;
        assert!(matches!(result, Err(Error::DuplicateContentLength)));
        assert_eq!(result.unwrap_err().failure(), Some(Failure::Malformed));
    }

    #[tokio::test]
    async fn test_post_with_body() {
        let request = b"POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: 5\r\n\r\nhello";
        let result = parse(request).await.unwrap();
        assert_eq!(result.method, Method::POST);
        assert_eq!(result.body.as_deref(), Some(&b"hello"[..]));
        assert_eq!(result.content_length(), Some(5));
    }

    #[tokio::test]
    async fn test_post_missing_content_length() {
        let result = parse(b"POST /files/a HTTP/1.1\r\nHost: a\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MissingHeader("Content-Length"))));
        assert_eq!(result.unwrap_err().failure(), Some(Failure::Malformed));
    }

    #[tokio::test]
    async fn test_post_invalid_content_length() {
        for value in ["abc", "-5", "1.5"] {
            let request = format!("POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: {value}\r\n\r\n");
            let err = parse(request.as_bytes()).await.unwrap_err();
            assert!(matches!(err, Error::InvalidContentLength(_)), "{value}");
            assert_eq!(err.failure(), Some(Failure::ServerError));
        }
    }

    #[tokio::test]
    async fn test_post_payload_too_large() {
        let request = b"POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: 1048577\r\n\r\n";
        let err = parse(request).await.unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { length: 1_048_577, .. }));
        assert_eq!(err.failure(), Some(Failure::PayloadTooLarge));
    }

    #[tokio::test]
    async fn test_post_short_body() {
        let request = b"POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: 10\r\n\r\nshort";
        let err = parse(request).await.unwrap_err();
        assert!(matches!(err, Error::IncompleteBody { expected: 10, received: 5 }));
        assert_eq!(err.failure(), Some(Failure::ServerError));
    }

    #[tokio::test]
    async fn test_sequential_requests_on_one_stream() {
        let input = b"POST /files/a HTTP/1.1\r\nHost: a\r\nContent-Length: 3\r\n\r\nabcGET /echo/x HTTP/1.1\r\nHost: a\r\n\r\n";
        let mut reader = &input[..];

        let first = read_request(&mut reader).await.unwrap();
        assert_eq!(first.body.as_deref(), Some(&b"abc"[..]));

        let second = read_request(&mut reader).await.unwrap();
        assert_eq!(second.path, "/echo/x");

        assert!(matches!(read_request(&mut reader).await, Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_get_body_is_not_read() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: a\r\nContent-Length: 3\r\n\r\nabc")
            .await
            .unwrap();
        assert!(result.body.is_none());
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b").unwrap(), b"/a b");
        assert_eq!(percent_decode("/%2E%2e").unwrap(), b"/..");
        assert_eq!(percent_decode("/plain").unwrap(), b"/plain");
        assert!(percent_decode("/bad%g0").is_none());
        assert!(percent_decode("/trailing%").is_none());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/").is_ok());
        assert!(validate_path("/files/report.txt").is_ok());
        assert!(validate_path("/echo/a.b").is_ok());
        assert!(validate_path("/files/a..b").is_err());
    }

    #[test]
    fn test_failure_literals() {
        let malformed = Failure::Malformed.as_bytes();
        assert!(malformed.starts_with(b"HTTP/1.1 400 Bad Request: Malformed Request Error\r\n"));
        assert!(malformed.ends_with(b"\r\n\r\n400 Bad Request: Malformed Request\r\n"));

        let too_large = Failure::PayloadTooLarge.as_bytes();
        assert!(too_large.starts_with(b"HTTP/1.1 413 Payload too large\r\nContent-Length: 21\r\n"));
        assert!(too_large.ends_with(b"\r\n\r\n413 Content Too Large"));

        let server_error = Failure::ServerError.as_bytes();
        assert!(server_error.starts_with(b"HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(server_error.ends_with(b"\r\n\r\n500 Server Error\r\n"));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::POST.to_string(), "POST");
    }

    #[test]
    fn test_http_version_display() {
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::default(), HttpVersion::Http11);
    }
}
