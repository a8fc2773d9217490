//! A minimal HTTP/1.1 origin server.
//!
//! This library parses raw request bytes under strict size and format
//! limits, dispatches a handful of fixed routes, and renders responses back
//! to wire bytes, optionally gzip-compressed, while keeping connections
//! alive between requests.
//!
//! # Features
//!
//! - Strict request parsing: `GET`/`POST` over `HTTP/1.1` only, capped
//!   request line, header count, header size and body size
//! - Path validation against traversal after percent-decoding
//! - Routes: `/`, `/echo/<text>`, `/user-agent`, `/files/<name>` (GET and POST)
//! - gzip response bodies when the client advertises support
//! - Keep-alive with one task per connection
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use fileserve_rs::{read_request, Method};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut input = &b"GET /echo/hello HTTP/1.1\r\nHost: localhost\r\n\r\n"[..];
//! let request = read_request(&mut input).await.unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.path, "/echo/hello");
//! # });
//! ```
//!
//! ## Error handling
//!
//! Every parse error maps to the literal response the client receives.
//!
//! ```
//! use fileserve_rs::{read_request, Failure, ParserError};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut input = &b"DELETE / HTTP/1.1\r\nHost: localhost\r\n\r\n"[..];
//! let err = read_request(&mut input).await.unwrap_err();
//! assert!(matches!(err, ParserError::InvalidMethod(_)));
//! assert_eq!(err.failure(), Some(Failure::Malformed));
//! # });
//! ```
//!
//! ## Running the server
//!
//! ```no_run
//! use fileserve_rs::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), fileserve_rs::ServerError> {
//! let config = ServerConfig {
//!     directory: Some("/tmp/files".into()),
//!     ..ServerConfig::default()
//! };
//! HttpServer::new(config).start().await
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{read_request, Error as ParserError, Failure, HttpRequest, HttpVersion, Method};
pub use server::{Error as ServerError, FileStore, HttpResponse, HttpServer, ServerConfig, StatusCode};
