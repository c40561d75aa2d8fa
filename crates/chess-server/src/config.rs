//! Server configuration.
//!
//! Settings come from an optional `chess-server.toml` and may be overridden
//! on the command line. Every field has a default, so an empty file (or no
//! file at all) yields a working server on `127.0.0.1:3000`.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ws::MAX_MESSAGES_PER_UPDATE;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value parsed but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Directory of static client files served for unknown paths.
    pub static_dir: PathBuf,
    /// Number of broadcast messages buffered per observer. An observer that
    /// falls further behind is resent the full state. Must be at least 4.
    pub broadcast_capacity: usize,
    /// Requests slower than this many milliseconds are logged as warnings.
    pub slow_request_ms: u64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            static_dir: PathBuf::from("public"),
            broadcast_capacity: 100,
            slow_request_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// File name searched for when no explicit path is given.
    pub const FILE_NAME: &'static str = "chess-server.toml";

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, `chess-server.toml` is
    /// looked up in the current directory and its two parents; if none is
    /// found the defaults are used. Returns the file actually read, if any.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = path {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        let candidates = [
            PathBuf::from(Self::FILE_NAME),
            Path::new("..").join(Self::FILE_NAME),
            Path::new("../..").join(Self::FILE_NAME),
        ];
        for candidate in candidates {
            if candidate.is_file() {
                let config = Self::from_file(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Reads and validates a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // a single update must fit in the buffer
        if self.broadcast_capacity < MAX_MESSAGES_PER_UPDATE {
            return Err(ConfigError::Invalid(format!(
                "broadcast_capacity must be at least {MAX_MESSAGES_PER_UPDATE}, got {}",
                self.broadcast_capacity
            )));
        }
        Ok(())
    }

    /// Returns the socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
