//! Handlers for the fixed routes.

use std::io;

use log::{error, info, warn};

use crate::parser::HttpRequest;
use crate::server::files::FileStore;
use crate::server::response::{HttpResponse, StatusCode};

/// `GET /`: an empty 200.
pub fn root(request: &HttpRequest) -> HttpResponse {
    HttpResponse::new(StatusCode::Ok).with_version(request.version)
}

/// `/echo/<text>`: reflect `<text>` exactly as it appeared in the path.
pub fn echo(request: &HttpRequest, text: &str) -> HttpResponse {
    HttpResponse::new(StatusCode::Ok)
        .with_version(request.version)
        .with_content_type("text/plain")
        .with_body_string(text)
}

/// `/user-agent`: reflect the `User-Agent` header, or nothing.
pub fn user_agent(request: &HttpRequest) -> HttpResponse {
    let agent = request.header("User-Agent").unwrap_or_default();
    HttpResponse::new(StatusCode::Ok)
        .with_version(request.version)
        .with_content_type("text/plain")
        .with_body_string(agent)
}

/// `GET /files/<name>`: serve the file's bytes.
pub async fn get_file(request: &HttpRequest, files: &FileStore, name: &str) -> HttpResponse {
    match files.read(name).await {
        Ok(contents) => HttpResponse::new(StatusCode::Ok)
            .with_version(request.version)
            .with_content_type("application/octet-stream")
            .with_body_bytes(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("File does not exist: {name}");
            HttpResponse::not_found().with_version(request.version)
        }
        Err(e) => {
            error!("Error reading file {name}: {e}");
            HttpResponse::server_error().with_version(request.version)
        }
    }
}

/// `POST /files/<name>`: store exactly `Content-Length` bytes of the body.
pub async fn post_file(request: &HttpRequest, files: &FileStore, name: &str) -> HttpResponse {
    let Some(length) = request.content_length() else {
        error!("Missing or invalid Content-Length on upload to {name}");
        return HttpResponse::server_error().with_version(request.version);
    };
    let contents = match request.body.as_deref() {
        Some(body) if body.len() as u64 >= length => &body[..length as usize],
        _ => {
            error!("Request body shorter than Content-Length {length} for {name}");
            return HttpResponse::server_error().with_version(request.version);
        }
    };

    match files.write(name, contents).await {
        Ok(path) => {
            info!("Wrote {length} bytes to {}", path.display());
            HttpResponse::new(StatusCode::Created)
        }
        Err(e) => {
            error!("Error writing file {name}: {e}");
            HttpResponse::server_error().with_version(request.version)
        }
    }
}
