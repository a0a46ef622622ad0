//! Read-only projection of a game for one kind of viewer.
//!
//! Switching between the operative and spymaster views only changes which
//! colors are visible; it never touches the underlying state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::board::{Color, Team};
use crate::domain::state::{Clue, GameState, TurnPhase};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    #[default]
    Operative,
    Spymaster,
}

impl ViewerRole {
    pub fn toggled(self) -> Self {
        match self {
            ViewerRole::Operative => ViewerRole::Spymaster,
            ViewerRole::Spymaster => ViewerRole::Operative,
        }
    }
}

impl FromStr for ViewerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operative" => Ok(ViewerRole::Operative),
            "spymaster" => Ok(ViewerRole::Spymaster),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub index: usize,
    pub word: String,
    pub revealed: bool,
    /// Hidden (`None`) for operatives until the cell is revealed.
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: String,
    pub version: i32,
    pub view: ViewerRole,
    pub phase: TurnPhase,
    pub current_team: Team,
    pub current_clue: Option<Clue>,
    pub guesses_remaining: u32,
    pub red_remaining: u32,
    pub blue_remaining: u32,
    pub winner: Option<Team>,
    pub board: Vec<CellView>,
}

pub fn snapshot(game_id: &str, version: i32, state: &GameState, view: ViewerRole) -> GameSnapshot {
    let board = state
        .board
        .iter()
        .enumerate()
        .map(|(index, cell)| CellView {
            index,
            word: cell.word.clone(),
            revealed: cell.revealed,
            color: match view {
                ViewerRole::Spymaster => Some(cell.color),
                ViewerRole::Operative if cell.revealed => Some(cell.color),
                ViewerRole::Operative => None,
            },
        })
        .collect();

    GameSnapshot {
        game_id: game_id.to_string(),
        version,
        view,
        phase: state.phase(),
        current_team: state.current_team,
        current_clue: state.current_clue.clone(),
        guesses_remaining: state.guesses_remaining,
        red_remaining: state.red_remaining,
        blue_remaining: state.blue_remaining,
        winner: state.winner,
        board,
    }
}
