//! WebSocket transport for live games.
//!
//! Every connected client is an observer of the shared game. On connect it
//! receives the current board, history and turn; afterwards it may submit
//! moves or request a new game, and it sees every state change made by any
//! client (or by the HTTP API) in the order the changes were applied.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::Response,
};
use chess_core::{Color, Move, Square};
use chess_engine::{Board, GameSnapshot};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::{broadcast, mpsc};

use crate::AppState;

/// Text sent to observers when a move ends the game.
pub const CHECKMATE_MESSAGE: &str = "Checkmate! Game over.";

/// Most messages a single mutation publishes (`move` plus the three sync
/// messages, or the sync messages plus `game_over`).
pub const MAX_MESSAGES_PER_UPDATE: usize = 4;

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request to move the piece on `from` to `to`, as `[row, col]` pairs.
    ///
    /// Coordinates are taken as plain integers so off-board values reach the
    /// engine and are rejected there with a proper message.
    Move { from: (i64, i64), to: (i64, i64) },
    /// Request to discard the current game and start over.
    NewGame,
}

/// Messages the server sends.
///
/// All messages use snake_case tag names for JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full board as an 8x8 grid of piece codes.
    GameState { board: Board },
    /// Every move played so far, oldest first.
    GameHistory { moves: Vec<Move> },
    /// Side to move.
    CurrentTurn { turn: Color },
    /// An accepted move that did not end the game.
    Move { from: Square, to: Square },
    /// The requester's move was rejected.
    InvalidMove { message: String },
    /// The game ended; no further moves are accepted until a new game.
    GameOver { message: String, winner: Color },
    /// The requester sent a frame that could not be understood.
    Error { message: String },
}

impl ServerMessage {
    /// The board, history and turn messages for a snapshot.
    pub fn sync(snapshot: &GameSnapshot) -> [ServerMessage; 3] {
        [
            ServerMessage::GameState {
                board: snapshot.board,
            },
            ServerMessage::GameHistory {
                moves: snapshot.moves.clone(),
            },
            ServerMessage::CurrentTurn {
                turn: snapshot.turn,
            },
        ]
    }

    /// Messages that bring a new or lagging observer up to date, including
    /// the end of the game if it is over.
    pub fn catch_up(snapshot: &GameSnapshot) -> Vec<ServerMessage> {
        let mut msgs = Self::sync(snapshot).to_vec();
        if snapshot.game_over {
            msgs.push(ServerMessage::GameOver {
                message: CHECKMATE_MESSAGE.to_string(),
                winner: snapshot.turn,
            });
        }
        msgs
    }
}

/// Axum handler for WebSocket upgrade requests.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Handles an established WebSocket connection.
///
/// Replies meant only for this client go through a private queue that is
/// drained ahead of the shared broadcast, so the initial sync always arrives
/// before any later update. An observer that falls behind the broadcast is
/// resubscribed and sent the full current state instead of the messages it
/// missed.
async fn handle_socket(socket: WebSocket, state: AppState, peer: SocketAddr) {
    tracing::info!(%peer, "client connected");

    let (mut sender, mut receiver) = socket.split();
    let (mut events, snapshot) = state.game.subscribe_with_snapshot().await;
    let (direct_tx, mut direct_rx) = mpsc::channel::<ServerMessage>(16);

    for msg in ServerMessage::catch_up(&snapshot) {
        if direct_tx.send(msg).await.is_err() {
            return;
        }
    }

    let game = state.game.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let batch = tokio::select! {
                biased;
                Some(msg) = direct_rx.recv() => vec![msg],
                result = events.recv() => match result {
                    Ok(msg) => vec![msg],
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(%peer, skipped, "observer lagged, resynchronizing");
                        let (fresh, snapshot) = game.subscribe_with_snapshot().await;
                        events = fresh;
                        ServerMessage::catch_up(&snapshot)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            for msg in batch {
                if !send_json(&mut sender, &msg, peer).await {
                    return;
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let reply = match msg {
                Message::Text(text) => handle_client_text(&state, &text, peer).await,
                Message::Close(_) => break,
                _ => None,
            };
            if let Some(reply) = reply {
                if direct_tx.send(reply).await.is_err() {
                    break;
                }
            }
        }
    });

    // Whichever side finishes first takes the other down with it.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(%peer, "client disconnected");
}

/// Encodes and sends one message. Returns false once the socket is gone.
async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
    peer: SocketAddr,
) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(%peer, error = %e, "failed to encode message");
            return true;
        }
    };
    sender.send(Message::Text(json)).await.is_ok()
}

/// Processes one text frame and returns the private reply, if any.
///
/// Successful moves and new games produce no private reply; their effects
/// reach this client through the broadcast like everyone else.
pub async fn handle_client_text(
    state: &AppState,
    text: &str,
    peer: SocketAddr,
) -> Option<ServerMessage> {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(%peer, error = %e, "unparseable client message");
            return Some(ServerMessage::Error {
                message: format!("invalid message: {e}"),
            });
        }
    };

    match msg {
        ClientMessage::Move { from, to } => match state.game.submit_move(from, to).await {
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(%peer, ?from, ?to, error = %e, "move rejected");
                Some(ServerMessage::InvalidMove {
                    message: e.to_string(),
                })
            }
        },
        ClientMessage::NewGame => {
            tracing::info!(%peer, "new game requested");
            state.game.reset().await;
            None
        }
    }
}
