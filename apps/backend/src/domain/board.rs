//! Board types and the seeded board generator.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

pub const BOARD_SIZE: usize = 25;
/// A clue can never point at more words than the board holds.
pub const MAX_CLUE_COUNT: u32 = BOARD_SIZE as u32;
pub const RED_AGENTS: u32 = 9;
pub const BLUE_AGENTS: u32 = 8;
pub const NEUTRAL_CELLS: u32 = 7;
pub const ASSASSIN_CELLS: u32 = 1;

/// A side that can take turns and win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Team::Red => Color::Red,
            Team::Blue => Color::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            other => Err(format!("unknown team '{other}'")),
        }
    }
}

/// The hidden identity of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Neutral,
    Assassin,
}

impl Color {
    /// The team that owns this color, if any.
    pub fn team(self) -> Option<Team> {
        match self {
            Color::Red => Some(Team::Red),
            Color::Blue => Some(Team::Blue),
            Color::Neutral | Color::Assassin => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub word: String,
    #[serde(rename = "team")]
    pub color: Color,
    #[serde(default)]
    pub revealed: bool,
}

impl Cell {
    pub fn hidden(word: impl Into<String>, color: Color) -> Self {
        Self {
            word: word.into(),
            color,
            revealed: false,
        }
    }
}

/// The fixed color multiset every board is dealt from, in canonical order.
pub fn color_distribution() -> Vec<Color> {
    let mut colors = Vec::with_capacity(BOARD_SIZE);
    colors.extend(std::iter::repeat_n(Color::Red, RED_AGENTS as usize));
    colors.extend(std::iter::repeat_n(Color::Blue, BLUE_AGENTS as usize));
    colors.extend(std::iter::repeat_n(
        Color::Neutral,
        NEUTRAL_CELLS as usize,
    ));
    colors.extend(std::iter::repeat_n(
        Color::Assassin,
        ASSASSIN_CELLS as usize,
    ));
    colors
}

/// Trim, drop empties and remove duplicates while keeping first-seen order.
pub fn distinct_words<S: AsRef<str>>(word_pool: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(word_pool.len());
    word_pool
        .iter()
        .map(|w| w.as_ref().trim())
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect()
}

/// Build a fresh 25-cell board.
///
/// Picks 25 distinct words from `word_pool` in random order and pairs them
/// positionally with a shuffled `{red×9, blue×8, neutral×7, assassin×1}`.
/// All randomness comes from `rng`, so a seeded generator yields the same board.
pub fn generate_board<S, R>(word_pool: &[S], rng: &mut R) -> Result<Vec<Cell>, DomainError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut words = distinct_words(word_pool);
    if words.len() < BOARD_SIZE {
        return Err(DomainError::validation(
            ValidationKind::InsufficientWords,
            format!(
                "Word pool has {} distinct words; a board needs {BOARD_SIZE}",
                words.len()
            ),
        ));
    }

    let (picked, _) = words.partial_shuffle(rng, BOARD_SIZE);
    let mut colors = color_distribution();
    colors.shuffle(rng);

    Ok(picked
        .iter()
        .zip(colors)
        .map(|(word, color)| Cell::hidden(word.clone(), color))
        .collect())
}
