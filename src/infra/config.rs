//! Centralized configuration (command line flags + environment variables + defaults).
//!
//! Every flag can also be set through its `FORMED_*` environment variable;
//! `main` loads a `.env` file first so those can live there.

use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_API_ADDR: &str = "tcp://0.0.0.0:8080";
pub const DEFAULT_FILE_STORE: &str = "./data/store.csv";

#[derive(Parser, Debug)]
#[command(name = "formed", version, about = "Serves a form of names backed by a flat file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a query api for the backend
    Query(QueryArgs),
    /// Print the OpenAPI document of the query api
    Openapi,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(long, env = "FORMED_DEBUG", help = "debug logging")]
    pub debug: bool,
    #[arg(
        long,
        env = "FORMED_API",
        default_value = DEFAULT_API_ADDR,
        help = "listen address for query API"
    )]
    pub api: String,
    #[arg(
        long,
        env = "FORMED_FILESTORE",
        default_value = DEFAULT_FILE_STORE,
        help = "location of the file store"
    )]
    pub filestore: PathBuf,
    #[arg(
        long = "ui-local",
        env = "FORMED_UI_LOCAL",
        help = "ignores embedded files and goes straight to the filesystem"
    )]
    pub ui_local: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("empty listen address")]
    EmptyAddr,
    #[error("unsupported network {0:?} (only tcp is supported)")]
    UnsupportedNetwork(String),
    #[error("invalid port in listen address {0:?}")]
    InvalidPort(String),
}

/// Resolved settings for `formed query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// `host:port` the API listener binds to.
    pub api_addr: String,
    pub file_store: PathBuf,
    pub debug: bool,
    pub ui_local: bool,
}

impl TryFrom<QueryArgs> for QueryConfig {
    type Error = ConfigError;

    fn try_from(args: QueryArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            api_addr: parse_addr(&args.api, DEFAULT_API_PORT)?,
            file_store: args.filestore,
            debug: args.debug,
            ui_local: args.ui_local,
        })
    }
}

/// Normalizes a listen address into `host:port`.
///
/// Accepts `tcp://host:port`, `host:port`, `:port` and a bare `host` (which
/// gets `default_port`). IPv6 hosts need brackets when a port is given.
pub fn parse_addr(addr: &str, default_port: u16) -> Result<String, ConfigError> {
    let addr = addr.trim();
    let addr = match addr.split_once("://") {
        Some(("tcp", rest)) => rest,
        Some((network, _)) => return Err(ConfigError::UnsupportedNetwork(network.to_string())),
        None => addr,
    };
    if addr.is_empty() {
        return Err(ConfigError::EmptyAddr);
    }

    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return Ok(socket.to_string());
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port).to_string());
    }

    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            let port: u16 = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(addr.to_string()))?;
            let host = if host.is_empty() { "0.0.0.0" } else { host };
            Ok(format!("{host}:{port}"))
        }
        Some(_) => Err(ConfigError::InvalidPort(addr.to_string())),
        None => Ok(format!("{addr}:{default_port}")),
    }
}
