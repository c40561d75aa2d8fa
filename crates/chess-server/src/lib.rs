//! Chess Server Library
//!
//! Hosts a single two-player chess game over HTTP and WebSocket. Every
//! client observes the same game; moves from any client are validated by
//! [`chess_engine`], applied one at a time and broadcast to all observers.
//!
//! Routes:
//! - `GET /health`
//! - `GET /ws` for the live WebSocket protocol (see [`ws`])
//! - `GET /api/game`, `POST /api/game/moves`, `POST /api/game/reset`,
//!   `GET /api/game/destinations`
//! - anything else is served from the static client directory

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;
pub mod ws;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub use config::{ConfigError, ServerConfig};
pub use state::{AppliedMove, GameHandle};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The live game and its broadcast channel.
    pub game: GameHandle,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        AppState {
            game: GameHandle::new(config.broadcast_capacity),
        }
    }
}

/// Health check endpoint.
///
/// Returns "ok" to indicate the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Builds the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    // CORS layer for cross-origin requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let threshold = middleware::SlowRequestThreshold::from_millis(config.slow_request_ms);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .route("/api/game", get(api::game::get_game))
        .route("/api/game/moves", post(api::game::post_move))
        .route("/api/game/reset", post(api::game::reset_game))
        .route("/api/game/destinations", get(api::game::get_destinations))
        .with_state(state)
        .fallback_service(
            ServeDir::new(&config.static_dir).append_index_html_on_directories(true),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    threshold,
                    middleware::timing_layer,
                ))
                .layer(cors),
        )
}
