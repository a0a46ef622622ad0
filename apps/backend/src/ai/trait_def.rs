//! Clue generator trait definition.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::board::{Cell, Team};

/// Errors that can occur while asking a generator for a clue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// Generator did not answer within the caller's timeout
    Timeout,
    /// Generator could not be reached or refused the request
    Unavailable(String),
    /// Generator answered with something unusable at the transport level
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Timeout => write!(f, "clue generator timeout"),
            AiError::Unavailable(msg) => write!(f, "clue generator unavailable: {msg}"),
            AiError::Internal(msg) => write!(f, "clue generator internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// What the generator sees: the full board and the team to give a clue for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueRequest {
    pub board: Vec<Cell>,
    pub team: Team,
}

/// Untrusted generator output, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSuggestion {
    /// Free text expected to contain `CLUE:` and `COUNT:` lines
    Text(String),
    /// A structured `{word, count}` object
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorStatus {
    pub name: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_model: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
}

/// Source of spymaster clues.
///
/// Implementations must be cheap to share across requests; the session
/// service holds one behind an `Arc` and applies its own timeout.
#[async_trait]
pub trait ClueGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn suggest(&self, request: &ClueRequest) -> Result<RawSuggestion, AiError>;

    async fn status(&self) -> GeneratorStatus {
        GeneratorStatus {
            name: self.name(),
            available: true,
            has_model: None,
            models: Vec::new(),
        }
    }
}
