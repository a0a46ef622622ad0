//! Domain-level error type used across the engine, services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule and input violations.
///
/// Everything except `InsufficientWords` and `InvalidGameId` is a rejected
/// game action: the state is left unchanged and the caller may carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// The game already has a winner
    GameOver,
    /// Reveal attempted without an active clue
    NoActiveClue,
    /// A clue was submitted while one is already active
    ClueAlreadyActive,
    /// Cell index outside the board
    CellOutOfRange,
    /// Cell was revealed earlier
    CellAlreadyRevealed,
    /// Clue word is empty after normalization
    EmptyClueWord,
    /// Clue count negative or larger than the board
    InvalidClueCount,
    /// A generated clue arrived after the game moved on
    StaleClue,
    /// Word pool has fewer distinct words than the board needs
    InsufficientWords,
    /// Game identifier failed normalization
    InvalidGameId,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    NotifierUnavailable,
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Insert raced with another insert for the same id
    GameExists,
    OptimisticLock,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or game rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True for rejected game actions (state unchanged, never fatal).
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(
                ValidationKind::GameOver
                    | ValidationKind::NoActiveClue
                    | ValidationKind::ClueAlreadyActive
                    | ValidationKind::CellOutOfRange
                    | ValidationKind::CellAlreadyRevealed
                    | ValidationKind::EmptyClueWord
                    | ValidationKind::InvalidClueCount
                    | ValidationKind::StaleClue,
                _
            )
        )
    }

    /// True when a collaborator (store, notifier) could not be reached and
    /// the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Infra(
                InfraErrorKind::DbUnavailable
                    | InfraErrorKind::NotifierUnavailable
                    | InfraErrorKind::Timeout,
                _
            )
        )
    }

    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::OptimisticLock, _))
    }
}
