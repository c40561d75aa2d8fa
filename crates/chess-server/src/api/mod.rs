//! HTTP API handlers for the chess server.

pub mod game;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_engine::MoveError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The engine refused the move.
    #[error(transparent)]
    Rejected(#[from] MoveError),
    /// The request body was not the expected JSON.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody(rejection) => rejection.status(),
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
