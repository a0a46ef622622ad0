//! Turn engine: pure transitions over `GameState`.
//!
//! Every function takes the current state by reference and returns either a
//! brand new state or a `DomainError::Validation` describing why the action
//! was rejected. The input state is never modified.

use serde::{Deserialize, Serialize};

use crate::domain::board::{Color, BOARD_SIZE, MAX_CLUE_COUNT};
use crate::domain::state::{Clue, GameState};
use crate::errors::domain::{DomainError, ValidationKind};

/// A user action the engine understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Reveal { index: usize },
    SubmitClue { word: String, count: u32 },
    EndTurn,
}

pub fn apply(state: &GameState, action: &Action) -> Result<GameState, DomainError> {
    match action {
        Action::Reveal { index } => reveal_cell(state, *index),
        Action::SubmitClue { word, count } => submit_clue(state, word, *count),
        Action::EndTurn => end_turn(state),
    }
}

fn ensure_not_over(state: &GameState) -> Result<(), DomainError> {
    match state.winner {
        Some(winner) => Err(DomainError::validation(
            ValidationKind::GameOver,
            format!("Game is over; {winner} won"),
        )),
        None => Ok(()),
    }
}

/// Flip the turn and clear the clue. Leaves `winner` alone.
fn pass_turn(next: &mut GameState) {
    next.current_team = next.current_team.opponent();
    next.current_clue = None;
    next.guesses_remaining = 0;
}

pub fn reveal_cell(state: &GameState, index: usize) -> Result<GameState, DomainError> {
    ensure_not_over(state)?;
    if state.current_clue.is_none() {
        return Err(DomainError::validation(
            ValidationKind::NoActiveClue,
            "Cannot reveal a cell before a clue is given",
        ));
    }
    let cell = state.board.get(index).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::CellOutOfRange,
            format!("Cell index {index} is outside 0..{BOARD_SIZE}"),
        )
    })?;
    if cell.revealed {
        return Err(DomainError::validation(
            ValidationKind::CellAlreadyRevealed,
            format!("Cell {index} ({}) is already revealed", cell.word),
        ));
    }

    let color = cell.color;
    let guessing = state.current_team;
    let mut next = state.clone();
    next.board[index].revealed = true;

    match color {
        Color::Assassin => {
            next.winner = Some(guessing.opponent());
        }
        Color::Red | Color::Blue if color == guessing.color() => {
            let remaining = next.remaining_mut(guessing);
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                next.winner = Some(guessing);
            } else {
                next.guesses_remaining = next.guesses_remaining.saturating_sub(1);
                if next.guesses_remaining == 0 {
                    pass_turn(&mut next);
                }
            }
        }
        Color::Red | Color::Blue => {
            let opponent = guessing.opponent();
            let remaining = next.remaining_mut(opponent);
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                next.winner = Some(opponent);
            }
            // The turn ends even when this reveal just handed the opponent the win.
            pass_turn(&mut next);
        }
        Color::Neutral => pass_turn(&mut next),
    }

    Ok(next)
}

pub fn submit_clue(state: &GameState, word: &str, count: u32) -> Result<GameState, DomainError> {
    ensure_not_over(state)?;
    if let Some(active) = &state.current_clue {
        return Err(DomainError::validation(
            ValidationKind::ClueAlreadyActive,
            format!(
                "Clue {} ({}) is already active for {}",
                active.word, active.count, state.current_team
            ),
        ));
    }
    let word = word.trim();
    if word.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyClueWord,
            "Clue word must not be empty",
        ));
    }
    if count > MAX_CLUE_COUNT {
        return Err(DomainError::validation(
            ValidationKind::InvalidClueCount,
            format!("Clue count {count} exceeds {MAX_CLUE_COUNT}"),
        ));
    }

    let mut next = state.clone();
    next.current_clue = Some(Clue {
        word: word.to_string(),
        count,
    });
    // One bonus guess beyond the stated count.
    next.guesses_remaining = count + 1;
    Ok(next)
}

pub fn end_turn(state: &GameState) -> Result<GameState, DomainError> {
    ensure_not_over(state)?;
    let mut next = state.clone();
    pass_turn(&mut next);
    Ok(next)
}
