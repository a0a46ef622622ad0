//! Transitions derived by diffing two consecutive game states.

use serde::Serialize;

use crate::domain::board::{Color, Team};
use crate::domain::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameTransition {
    /// A clue became active.
    ClueGiven { word: String, count: u32 },

    /// A hidden cell was turned over.
    CellRevealed { index: usize, color: Color },

    /// Edge-triggered: the game gained a winner.
    GameWon { winner: Team },

    /// Edge-triggered: the other team is now on turn.
    TurnPassed { to: Team },
}

/// Derive domain transitions from before/after states.
pub fn derive_game_transitions(before: &GameState, after: &GameState) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    // 1. Clue appeared
    if before.current_clue.is_none() {
        if let Some(clue) = &after.current_clue {
            transitions.push(GameTransition::ClueGiven {
                word: clue.word.clone(),
                count: clue.count,
            });
        }
    }

    // 2. Newly revealed cells
    for (index, (old, new)) in before.board.iter().zip(&after.board).enumerate() {
        if !old.revealed && new.revealed {
            transitions.push(GameTransition::CellRevealed {
                index,
                color: new.color,
            });
        }
    }

    // 3. Game won
    if before.winner.is_none() {
        if let Some(winner) = after.winner {
            transitions.push(GameTransition::GameWon { winner });
        }
    }

    // 4. Turn change
    if before.current_team != after.current_team {
        transitions.push(GameTransition::TurnPassed {
            to: after.current_team,
        });
    }

    transitions
}
