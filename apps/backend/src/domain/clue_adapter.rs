//! Normalizes untrusted clue generator output into a playable `Clue`.
//!
//! A failed or unparseable suggestion never becomes an error: the game gets a
//! fixed fallback clue and the caller gets a warning to surface.

use lazy_regex::regex_captures;
use serde::Serialize;
use serde_json::Value;

use crate::ai::{AiError, RawSuggestion};
use crate::domain::board::MAX_CLUE_COUNT;
use crate::domain::state::Clue;
use crate::errors::domain::{DomainError, ValidationKind};

pub const FAILED_FALLBACK_WORD: &str = "GUESS";
pub const UNPARSEABLE_FALLBACK_WORD: &str = "THINK";
pub const FALLBACK_COUNT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueWarning {
    /// The generator failed or timed out
    GeneratorFailed,
    /// The generator answered but no `{word, count}` could be read
    Unparseable,
}

impl ClueWarning {
    pub fn message(self) -> &'static str {
        match self {
            ClueWarning::GeneratorFailed => "Clue generator unavailable; using fallback clue",
            ClueWarning::Unparseable => "Could not read the generated clue; using fallback clue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptedClue {
    pub clue: Clue,
    pub warning: Option<ClueWarning>,
}

impl AdaptedClue {
    fn fallback(word: &str, warning: ClueWarning) -> Self {
        Self {
            clue: Clue {
                word: word.to_string(),
                count: FALLBACK_COUNT,
            },
            warning: Some(warning),
        }
    }
}

pub fn adapt(raw: Result<RawSuggestion, AiError>) -> AdaptedClue {
    let suggestion = match raw {
        Ok(s) => s,
        Err(_) => return AdaptedClue::fallback(FAILED_FALLBACK_WORD, ClueWarning::GeneratorFailed),
    };

    let parsed = match &suggestion {
        RawSuggestion::Text(text) => parse_text(text),
        RawSuggestion::Json(value) => parse_json(value),
    };

    match parsed {
        Some(clue) => AdaptedClue {
            clue,
            warning: None,
        },
        None => AdaptedClue::fallback(UNPARSEABLE_FALLBACK_WORD, ClueWarning::Unparseable),
    }
}

/// Read `CLUE: <word>` / `COUNT: <n>` lines, case-insensitively.
pub fn parse_text(text: &str) -> Option<Clue> {
    let (_, word) = regex_captures!(r"CLUE:\s*(\w+)"i, text)?;
    let (_, digits) = regex_captures!(r"COUNT:\s*(\d+)"i, text)?;
    // Only digits matched, so the sole failure mode is overflow.
    let count = digits
        .parse::<u32>()
        .map_or(MAX_CLUE_COUNT, |n| n.min(MAX_CLUE_COUNT));
    Some(Clue {
        word: word.to_uppercase(),
        count,
    })
}

/// Read a `{word, count}` object; `count` may be a number or a numeric string.
pub fn parse_json(value: &Value) -> Option<Clue> {
    let word = normalize_word(value.get("word")?.as_str()?)?;
    let count = coerce_count(value.get("count")?)?;
    Some(Clue { word, count })
}

pub fn normalize_word(word: &str) -> Option<String> {
    let word = word.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_uppercase())
    }
}

/// Count from a JSON number or numeric string.
/// Negatives clamp to 0, fractions floor, and anything past the board clamps
/// to `MAX_CLUE_COUNT`.
pub fn coerce_count(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(clamp_count(number.floor()))
}

fn clamp_count(n: f64) -> u32 {
    if n <= 0.0 {
        0
    } else if n >= f64::from(MAX_CLUE_COUNT) {
        MAX_CLUE_COUNT
    } else {
        n as u32
    }
}

/// Normalize a clue typed by a player. Unlike generator output, a count
/// outside `0..=MAX_CLUE_COUNT` is rejected rather than clamped.
/// An empty word stays empty so the engine can reject it.
pub fn normalize_manual(word: &str, count: i64) -> Result<Clue, DomainError> {
    let count = u32::try_from(count)
        .ok()
        .filter(|n| *n <= MAX_CLUE_COUNT)
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidClueCount,
                format!("Clue count must be between 0 and {MAX_CLUE_COUNT}, got {count}"),
            )
        })?;
    Ok(Clue {
        word: word.trim().to_uppercase(),
        count,
    })
}
