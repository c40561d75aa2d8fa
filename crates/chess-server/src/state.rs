//! Shared, serialized access to the live game.

use chess_core::Square;
use chess_engine::{Game, GameSnapshot, MoveError, MoveOutcome};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::ws::ServerMessage;

/// Result of a move accepted through [`GameHandle::submit_move`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMove {
    pub outcome: MoveOutcome,
    pub snapshot: GameSnapshot,
}

/// Handle to one game and its observers.
///
/// Clones share the same game. Every mutation takes the lock, applies the
/// change and publishes the resulting messages before releasing it, so
/// observers see updates in exactly the order they were applied.
#[derive(Clone)]
pub struct GameHandle {
    game: Arc<Mutex<Game>>,
    events: broadcast::Sender<ServerMessage>,
}

impl GameHandle {
    /// Creates a handle around a fresh game.
    ///
    /// `capacity` is the number of messages buffered per observer and must
    /// be non-zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_game(Game::new(), capacity)
    }

    /// Creates a handle around an existing game.
    pub fn with_game(game: Game, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        GameHandle {
            game: Arc::new(Mutex::new(game)),
            events,
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> GameSnapshot {
        self.game.lock().await.snapshot()
    }

    /// Subscribes to updates and returns the state they start from.
    ///
    /// Both are taken under the lock, so no update is missed or seen twice.
    pub async fn subscribe_with_snapshot(
        &self,
    ) -> (broadcast::Receiver<ServerMessage>, GameSnapshot) {
        let game = self.game.lock().await;
        (self.events.subscribe(), game.snapshot())
    }

    /// Squares the piece on `from` may move to, ignoring whose turn it is.
    pub async fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.game.lock().await.legal_destinations(from)
    }

    /// Applies a move and notifies observers.
    ///
    /// An accepted move publishes `move`, then the board, history and turn.
    /// A checkmating move publishes the board, history and turn followed by
    /// `game_over`. Rejections publish nothing.
    pub async fn submit_move(
        &self,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Result<AppliedMove, MoveError> {
        let mut game = self.game.lock().await;
        let outcome = game.attempt_move(from, to)?;
        let snapshot = game.snapshot();

        tracing::info!(?from, ?to, ?outcome, ply = snapshot.moves.len(), "move applied");

        match outcome {
            MoveOutcome::Accepted => {
                if let Some(last) = snapshot.moves.last() {
                    self.publish(ServerMessage::Move {
                        from: last.from,
                        to: last.to,
                    });
                }
                self.publish_sync(&snapshot);
            }
            MoveOutcome::Checkmate => {
                for msg in ServerMessage::catch_up(&snapshot) {
                    self.publish(msg);
                }
            }
        }

        drop(game);
        Ok(AppliedMove { outcome, snapshot })
    }

    /// Starts a new game and notifies observers.
    pub async fn reset(&self) -> GameSnapshot {
        let mut game = self.game.lock().await;
        let snapshot = game.reset();
        tracing::info!("game reset");
        self.publish_sync(&snapshot);
        snapshot
    }

    fn publish_sync(&self, snapshot: &GameSnapshot) {
        for msg in ServerMessage::sync(snapshot) {
            self.publish(msg);
        }
    }

    fn publish(&self, msg: ServerMessage) {
        // an error only means nobody is listening
        let _ = self.events.send(msg);
    }
}
