//! DTOs for games_sea adapter.

use sea_orm::prelude::Json;

/// Every mutable column of a game row, already encoded for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFields {
    pub board: Json,
    pub current_team: String,
    pub current_clue: Option<Json>,
    pub guesses_remaining: i32,
    pub red_remaining: i16,
    pub blue_remaining: i16,
    pub winner: Option<String>,
}

/// DTO for inserting a new game row (version starts at 1).
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub id: String,
    pub fields: GameFields,
}

/// DTO for replacing a game's columns under optimistic locking.
///
/// The update only applies if the stored version equals `expected_version`;
/// on success the version is incremented by one.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub id: String,
    pub expected_version: i32,
    pub fields: GameFields,
}
