//! fileserve: serve the fixed HTTP routes on a loopback port.
//!
//! Configuration comes from an optional JSON file, overridden by flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use fileserve_rs::{HttpServer, ServerConfig};

/// Command-line arguments for the server
#[derive(Parser, Debug)]
#[command(name = "fileserve")]
#[command(version)]
#[command(about = "A minimal HTTP/1.1 server with echo and file routes", long_about = None)]
struct CliArgs {
    /// Directory that `/files/<name>` reads from and writes to
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Address to bind to (e.g., 127.0.0.1:4221)
    #[arg(short, long)]
    addr: Option<SocketAddr>,

    /// Path to JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-request read deadline in seconds
    #[arg(long)]
    read_timeout: Option<u64>,
}

impl CliArgs {
    fn into_config(self) -> Result<ServerConfig, fileserve_rs::ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(directory) = self.directory {
            config.directory = Some(directory);
        }
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(secs) = self.read_timeout {
            config.read_timeout_secs = Some(secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CliArgs::parse().into_config()?;
    info!("Starting fileserve on {}", config.addr);

    HttpServer::new(config).start().await?;
    Ok(())
}
