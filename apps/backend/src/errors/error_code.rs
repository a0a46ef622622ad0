//! Error codes for the Codenames backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Codenames backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Rejected game actions
    /// Game already has a winner
    GameOver,
    /// Reveal without an active clue
    NoActiveClue,
    /// Second clue in the same turn
    ClueAlreadyActive,
    /// Cell was already revealed
    CellAlreadyRevealed,
    /// Generated clue arrived after the game moved on
    StaleClue,

    // Request Validation
    /// Cell index outside the board
    CellOutOfRange,
    /// Clue word empty after normalization
    EmptyClueWord,
    /// Clue count negative or larger than the board
    InvalidClueCount,
    /// Invalid game ID provided
    InvalidGameId,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Game id already taken
    GameExists,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Word pool too small to build a board
    InsufficientWords,
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Realtime notifier unavailable
    NotifierUnavailable,
    /// Upstream timeout
    Timeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GameOver => "GAME_OVER",
            Self::NoActiveClue => "NO_ACTIVE_CLUE",
            Self::ClueAlreadyActive => "CLUE_ALREADY_ACTIVE",
            Self::CellAlreadyRevealed => "CELL_ALREADY_REVEALED",
            Self::StaleClue => "STALE_CLUE",

            Self::CellOutOfRange => "CELL_OUT_OF_RANGE",
            Self::EmptyClueWord => "EMPTY_CLUE_WORD",
            Self::InvalidClueCount => "INVALID_CLUE_COUNT",
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::GameExists => "GAME_EXISTS",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::InsufficientWords => "INSUFFICIENT_WORDS",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::NotifierUnavailable => "NOTIFIER_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
