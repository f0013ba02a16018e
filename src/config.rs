//! Configuration for the Pokedex service
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Default port when neither PORT nor NODE_PORT is set
pub const DEFAULT_PORT: u16 = 3000;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Pokedex - in-memory creature catalog over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "pokedex")]
#[command(about = "Read/write HTTP access to an in-memory Pokedex")]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Fallback port, used when PORT is not set
    #[arg(long, env = "NODE_PORT")]
    pub node_port: Option<u16>,

    /// JSON seed file; the bundled catalog is used when absent
    #[arg(long, env = "POKEDEX_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Append one JSON line per request to this file
    #[arg(long, env = "ACCESS_LOG_PATH")]
    pub access_log: Option<PathBuf>,
}

impl Args {
    /// Effective port: PORT, then NODE_PORT, then 3000
    pub fn port(&self) -> u16 {
        self.port.or(self.node_port).unwrap_or(DEFAULT_PORT)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port() == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LEVELS.join(", "),
                self.log_level
            ));
        }

        if let Some(ref path) = self.seed_file {
            if !path.is_file() {
                return Err(format!("Seed file not found: {}", path.display()));
            }
        }

        Ok(())
    }
}
