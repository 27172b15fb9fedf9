use thiserror::Error;

use crate::archive::{Board, Button};

/// Error code returned when the nickname is unknown to the archive.
pub const CODE_NOT_FOUND: i64 = 101;
/// Error code returned by the tier endpoint when the player has no tier yet.
pub const CODE_NO_TIER: i64 = 111;
/// Error code returned for a board that does not exist for the button.
pub const CODE_INVALID_BOARD: i64 = 900;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Player not found: {nickname}")]
    NotFound { nickname: String },

    #[error("Invalid board {board} for {button}")]
    InvalidBoard { button: Button, board: Board },

    #[error("Archive API error {code} (HTTP {status})")]
    Api { status: u16, code: i64 },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error means the nickname does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this error means the board is not offered for the button
    pub fn is_invalid_board(&self) -> bool {
        matches!(self, Error::InvalidBoard { .. })
    }

    /// Domain error code carried by an unclassified API error, if any
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
