//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod clue_adapter;
pub mod engine;
pub mod game_transition;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod words;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_scenarios;

// Re-exports for ergonomics
pub use board::{generate_board, Cell, Color, Team, BOARD_SIZE, MAX_CLUE_COUNT};
pub use clue_adapter::{adapt, AdaptedClue, ClueWarning};
pub use engine::{apply, end_turn, reveal_cell, submit_clue, Action};
pub use game_transition::{derive_game_transitions, GameTransition};
pub use seed_derivation::derive_board_seed;
pub use snapshot::{snapshot, GameSnapshot, ViewerRole};
pub use state::{Clue, GameState, TurnPhase};
