//! Dispatch of validated requests to the fixed routes.

use crate::parser::{HttpRequest, Method};
use crate::server::files::FileStore;
use crate::server::handler;
use crate::server::response::HttpResponse;

/// The result of routing one request.
#[derive(Debug)]
pub struct Routed {
    /// The response to render.
    pub response: HttpResponse,
    /// False only when no route matched the path.
    pub matched: bool,
}

impl Routed {
    fn matched(response: HttpResponse) -> Self {
        Self { response, matched: true }
    }
}

/// Map a request to its response.
///
/// Routes are tried in a fixed order: `/`, `/echo/`, `/user-agent`, then
/// `/files/`. Failures are always resolved into a response here.
pub async fn route(request: &HttpRequest, files: &FileStore) -> Routed {
    let path = request.path.as_str();

    if path == "/" {
        return Routed::matched(handler::root(request));
    }
    if let Some(text) = path.strip_prefix("/echo/") {
        return Routed::matched(handler::echo(request, text));
    }
    if path.starts_with("/user-agent") {
        return Routed::matched(handler::user_agent(request));
    }
    if let Some(name) = path.strip_prefix("/files/") {
        let response = match request.method {
            Method::GET => handler::get_file(request, files, name).await,
            Method::POST => handler::post_file(request, files, name).await,
        };
        return Routed::matched(response);
    }

    Routed {
        response: HttpResponse::not_found().with_version(request.version),
        matched: false,
    }
}
