//! HTTP server implementation for fileserve-rs.
//!
//! Everything downstream of a parsed request: routing, the file store,
//! response rendering, and the per-connection read-respond loop.

mod config;
mod error;
mod files;
mod handler;
mod http_server;
mod render;
mod response;
mod router;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use files::FileStore;
pub use http_server::HttpServer;
pub use render::{gzip, render, Rendered};
pub use response::{HttpResponse, StatusCode, NOT_FOUND_BODY, SERVER_ERROR_BODY};
pub use router::{route, Routed};
