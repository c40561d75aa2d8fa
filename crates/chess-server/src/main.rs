//! Chess Server
//!
//! Serves one shared chess game to browser clients over WebSocket, with a
//! small JSON API and the static client files alongside.

use anyhow::Context;
use chess_server::{router, AppState, ServerConfig};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chess Server - Real-time two-player chess over WebSocket.
#[derive(Parser, Debug)]
#[command(name = "chess-server")]
#[command(about = "Real-time two-player chess server")]
struct Args {
    /// Path to a config file (default: search for chess-server.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory of static client files
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = static_dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();

    let (mut config, source) =
        ServerConfig::load(args.config.take().as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &source {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file found, using defaults"),
    }
    if !config.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} does not exist; only the API will be served",
            config.static_dir.display()
        );
    }

    let state = AppState::new(&config);
    let app = router(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from([
            "chess-server",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--static-dir",
            "client",
        ])
        .unwrap();

        let mut config = ServerConfig::default();
        args.apply(&mut config);
        let expected: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        assert_eq!(config.socket_addr(), expected);
        assert_eq!(config.static_dir, PathBuf::from("client"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let args = Args::try_parse_from(["chess-server"]).unwrap();
        assert!(args.config.is_none());

        let mut config = ServerConfig::default();
        args.apply(&mut config);
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        assert!(Args::try_parse_from(["chess-server", "--port", "70000"]).is_err());
    }
}
