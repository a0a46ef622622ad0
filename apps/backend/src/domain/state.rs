//! Authoritative per-game state and its invariants.

use serde::{Deserialize, Serialize};

use crate::domain::board::{
    Cell, Color, Team, ASSASSIN_CELLS, BLUE_AGENTS, BOARD_SIZE, NEUTRAL_CELLS, RED_AGENTS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub word: String,
    pub count: u32,
}

/// Where a team-turn currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingClue,
    ClueActive,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Vec<Cell>,
    pub current_team: Team,
    pub current_clue: Option<Clue>,
    pub guesses_remaining: u32,
    pub red_remaining: u32,
    pub blue_remaining: u32,
    pub winner: Option<Team>,
}

/// A broken invariant found in a state value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("board has {0} cells, expected {BOARD_SIZE}")]
    BoardSize(usize),
    #[error("board has {actual} {color:?} cells, expected {expected}")]
    ColorCount {
        color: Color,
        expected: u32,
        actual: u32,
    },
    #[error("{team} remaining is {recorded} but {actual} {team} cells are unrevealed")]
    RemainingMismatch {
        team: Team,
        recorded: u32,
        actual: u32,
    },
    #[error("guesses_remaining is {0} without an active clue")]
    GuessesWithoutClue(u32),
    #[error("{0} has no agents left but no winner is recorded")]
    MissingWinner(Team),
    #[error("assassin revealed but no winner is recorded")]
    AssassinWithoutWinner,
}

impl GameState {
    /// Initial state for a freshly generated board: red opens, nobody has a clue.
    pub fn new(board: Vec<Cell>) -> Self {
        let red_remaining = count_unrevealed(&board, Color::Red);
        let blue_remaining = count_unrevealed(&board, Color::Blue);
        Self {
            board,
            current_team: Team::Red,
            current_clue: None,
            guesses_remaining: 0,
            red_remaining,
            blue_remaining,
            winner: None,
        }
    }

    pub fn unrevealed_count(&self, color: Color) -> u32 {
        count_unrevealed(&self.board, color)
    }

    pub fn remaining_for(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_remaining,
            Team::Blue => self.blue_remaining,
        }
    }

    pub(crate) fn remaining_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Red => &mut self.red_remaining,
            Team::Blue => &mut self.blue_remaining,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    pub fn phase(&self) -> TurnPhase {
        if self.is_terminal() {
            TurnPhase::Terminal
        } else if self.current_clue.is_some() {
            TurnPhase::ClueActive
        } else {
            TurnPhase::AwaitingClue
        }
    }

    /// Verify every structural invariant of a game state.
    ///
    /// Used on records read back from the store and after every transition in
    /// property tests.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.board.len() != BOARD_SIZE {
            return Err(InvariantViolation::BoardSize(self.board.len()));
        }

        for (color, expected) in [
            (Color::Red, RED_AGENTS),
            (Color::Blue, BLUE_AGENTS),
            (Color::Neutral, NEUTRAL_CELLS),
            (Color::Assassin, ASSASSIN_CELLS),
        ] {
            let actual = self.board.iter().filter(|c| c.color == color).count() as u32;
            if actual != expected {
                return Err(InvariantViolation::ColorCount {
                    color,
                    expected,
                    actual,
                });
            }
        }

        for team in [Team::Red, Team::Blue] {
            let actual = self.unrevealed_count(team.color());
            let recorded = self.remaining_for(team);
            if recorded != actual {
                return Err(InvariantViolation::RemainingMismatch {
                    team,
                    recorded,
                    actual,
                });
            }
            if recorded == 0 && self.winner.is_none() {
                return Err(InvariantViolation::MissingWinner(team));
            }
        }

        if self.current_clue.is_none() && self.guesses_remaining != 0 {
            return Err(InvariantViolation::GuessesWithoutClue(
                self.guesses_remaining,
            ));
        }

        let assassin_revealed = self
            .board
            .iter()
            .any(|c| c.color == Color::Assassin && c.revealed);
        if assassin_revealed && self.winner.is_none() {
            return Err(InvariantViolation::AssassinWithoutWinner);
        }

        Ok(())
    }
}

fn count_unrevealed(board: &[Cell], color: Color) -> u32 {
    board
        .iter()
        .filter(|c| c.color == color && !c.revealed)
        .count() as u32
}
