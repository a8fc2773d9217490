//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::task::JoinSet;

use crate::parser::{read_request, Error as ParserError, HttpRequest};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::files::FileStore;
use crate::server::render::render;
use crate::server::router::route;

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The file store shared read-only by every connection.
    files: Arc<FileStore>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let files = Arc::new(FileStore::new(config.directory.clone()));
        Self { config, files }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        Ok(listener)
    }

    /// Handle connection errors.
    async fn handle_accept_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");
        // Usually descriptor exhaustion; give in-flight connections a moment to finish.
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    /// Spawn the task that owns one accepted connection.
    fn handle_new_connection(
        socket: TcpStream,
        addr: SocketAddr,
        files: Arc<FileStore>,
        read_timeout: Option<Duration>,
        tasks: &mut JoinSet<()>,
    ) {
        debug!("Accepted connection from {addr}");
        tasks.spawn(async move {
            match Self::handle_connection(socket, &files, read_timeout).await {
                Ok(()) => debug!("Connection from {addr} closed"),
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
        });
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;
        if drained.is_err() {
            warn!("Shutdown timed out, dropping {len} connections", len = tasks.len());
            tasks.abort_all();
        }

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    pub async fn start(&self) -> Result<(), Error> {
        match &self.config.directory {
            Some(directory) => info!("Serving files from {}", directory.display()),
            None => info!("No file directory configured"),
        }
        let listener = self.setup_listener().await?;
        self.serve(listener).await
    }

    /// Accept connections on `listener` until Ctrl+C.
    ///
    /// Each connection runs in its own task; the accept loop itself never
    /// touches request data.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        let read_timeout = self.config.read_timeout();
        let mut tasks = JoinSet::new();
        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check for shutdown signal
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!("Error listening for Ctrl+C: {e}");
                    }
                    info!("Shutting down server...");
                    break;
                }

                // Reap finished connections
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => Self::handle_new_connection(
                            socket,
                            addr,
                            self.files.clone(),
                            read_timeout,
                            &mut tasks,
                        ),
                        Err(e) => Self::handle_accept_error(e).await,
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Read one request, bounded by `read_timeout` when set.
    async fn next_request<S>(
        stream: &mut BufReader<S>,
        read_timeout: Option<Duration>,
    ) -> Result<HttpRequest, ParserError>
    where
        S: AsyncRead + Unpin,
    {
        match read_timeout {
            Some(deadline) => tokio::time::timeout(deadline, read_request(stream))
                .await
                .unwrap_or(Err(ParserError::Timeout)),
            None => read_request(stream).await,
        }
    }

    /// Serve requests on one connection until it closes.
    ///
    /// A parse failure writes its literal response and ends the connection.
    /// Otherwise each request is routed and rendered, and the loop continues
    /// unless the rendered response asks to close.
    pub async fn handle_connection<S>(
        socket: S,
        files: &FileStore,
        read_timeout: Option<Duration>,
    ) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut stream = BufReader::new(socket);

        loop {
            let request = match Self::next_request(&mut stream, read_timeout).await {
                Ok(request) => request,
                Err(e) => {
                    match e.failure() {
                        Some(failure) => {
                            warn!("Rejecting request: {e}");
                            stream.write_all(failure.as_bytes()).await?;
                            stream.flush().await?;
                        }
                        None => debug!("Closing connection: {e}"),
                    }
                    return Ok(());
                }
            };

            info!("{}", request.request_line);
            let routed = route(&request, files).await;
            if !routed.matched {
                warn!("No route for {}", request.path);
            }

            let rendered = render(routed.response, &request);
            stream.write_all(&rendered.bytes).await?;
            stream.flush().await?;

            if rendered.close {
                return Ok(());
            }
        }
    }
}
