//! Game API handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chess_core::Square;
use chess_engine::{GameSnapshot, MoveError};
use serde::Deserialize;

use super::ApiError;
use crate::state::AppliedMove;
use crate::AppState;

/// Body of a move request, as `[row, col]` pairs.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: (i64, i64),
    pub to: (i64, i64),
}

/// Query parameters selecting one square.
#[derive(Debug, Deserialize)]
pub struct SquareQuery {
    pub row: i64,
    pub col: i64,
}

/// Current game state.
///
/// # Endpoint
///
/// `GET /api/game`
///
/// # Response
///
/// - `200 OK`: JSON game snapshot
pub async fn get_game(State(state): State<AppState>) -> Json<GameSnapshot> {
    Json(state.game.snapshot().await)
}

/// Submit a move.
///
/// # Endpoint
///
/// `POST /api/game/moves`
///
/// # Response
///
/// - `200 OK`: JSON `{outcome, snapshot}`; observers are notified
/// - `422 Unprocessable Entity`: JSON `{error}` describing the rejection
/// - `400` / `415`: JSON `{error}` when the body is not a move request
pub async fn post_move(
    State(state): State<AppState>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<AppliedMove>, ApiError> {
    let Json(request) = body?;
    let applied = state.game.submit_move(request.from, request.to).await?;
    Ok(Json(applied))
}

/// Start a new game.
///
/// # Endpoint
///
/// `POST /api/game/reset`
///
/// # Response
///
/// - `200 OK`: JSON snapshot of the fresh game; observers are notified
pub async fn reset_game(State(state): State<AppState>) -> Json<GameSnapshot> {
    Json(state.game.reset().await)
}

/// Squares the piece on a square may move to, whoever's turn it is.
///
/// # Endpoint
///
/// `GET /api/game/destinations?row=R&col=C`
///
/// # Response
///
/// - `200 OK`: JSON array of `[row, col]` pairs, empty for an empty square
/// - `422 Unprocessable Entity`: the square is off the board
pub async fn get_destinations(
    State(state): State<AppState>,
    Query(query): Query<SquareQuery>,
) -> Result<Json<Vec<Square>>, ApiError> {
    let from = Square::from_coords(query.row, query.col).ok_or(MoveError::InvalidPosition {
        row: query.row,
        col: query.col,
    })?;
    Ok(Json(state.game.legal_destinations(from).await))
}
