//! Session coordinator: the only place game state meets the store, the
//! notifier and the clue generator.
//!
//! Every mutation is a read-compute-conditional-write loop. The turn engine
//! always runs against a freshly read record, and the record the store hands
//! back after the write is what gets published.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ai::{AiError, ClueGenerator, ClueRequest};
use crate::domain::board::generate_board;
use crate::domain::clue_adapter::{adapt, normalize_manual, ClueWarning};
use crate::domain::engine;
use crate::domain::game_transition::{derive_game_transitions, GameTransition};
use crate::domain::seed_derivation::derive_board_seed;
use crate::domain::state::GameState;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::games::{GameRecord, GameStore};
use crate::utils::game_code::generate_game_code;
use crate::ws::hub::GameNotifier;

/// Attempts of the read-compute-write loop before an optimistic-lock conflict
/// is reported to the caller.
pub const MAX_MUTATION_ATTEMPTS: usize = 3;

/// Fresh codes tried by `create_game` before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 20;

pub const MAX_GAME_ID_LEN: usize = 64;

/// Trim and lowercase a user supplied game id, then check it is 1-64
/// characters of `[a-z0-9-]`.
pub fn normalize_game_id(raw: &str) -> Result<String, DomainError> {
    let id = raw.trim().to_ascii_lowercase();
    if id.is_empty() || id.len() > MAX_GAME_ID_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidGameId,
            format!("Game id must be 1 to {MAX_GAME_ID_LEN} characters"),
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(DomainError::validation(
            ValidationKind::InvalidGameId,
            "Game id may only contain letters, digits and '-'",
        ));
    }
    Ok(id)
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on one clue generator call.
    pub clue_timeout: Duration,
    /// When set, each game's board is derived from this seed and its id.
    pub base_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clue_timeout: Duration::from_secs(30),
            base_seed: None,
        }
    }
}

/// Result of a committed mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The record as persisted by the store.
    pub record: GameRecord,
    pub transitions: Vec<GameTransition>,
    /// Set when a generated clue fell back to a default.
    pub warning: Option<ClueWarning>,
}

pub struct GameSessionService {
    store: Arc<dyn GameStore>,
    notifier: Arc<dyn GameNotifier>,
    generator: Arc<dyn ClueGenerator>,
    word_pool: Arc<[String]>,
    config: SessionConfig,
}

impl GameSessionService {
    pub fn new(
        store: Arc<dyn GameStore>,
        notifier: Arc<dyn GameNotifier>,
        generator: Arc<dyn ClueGenerator>,
        word_pool: Vec<String>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            generator,
            word_pool: word_pool.into(),
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }

    pub fn generator(&self) -> &Arc<dyn ClueGenerator> {
        &self.generator
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn board_rng(&self, game_id: &str) -> ChaCha8Rng {
        match self.config.base_seed {
            Some(base) => ChaCha8Rng::seed_from_u64(derive_board_seed(base, game_id)),
            None => ChaCha8Rng::from_os_rng(),
        }
    }

    async fn require(&self, game_id: &str) -> Result<GameRecord, DomainError> {
        self.store.find(game_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })
    }

    async fn publish(&self, record: &GameRecord) -> Result<(), AppError> {
        self.notifier.publish(record).await.map_err(|e| {
            warn!(game_id = %record.id, version = record.version, error = %e, "notify failed after commit");
            AppError::from(DomainError::infra(
                InfraErrorKind::NotifierUnavailable,
                format!("Game {} was saved but observers were not notified: {e}", record.id),
            ))
        })
    }

    /// Generate a board for `game_id` and insert it. Nothing is persisted when
    /// the word pool is too small.
    async fn insert_new(&self, game_id: &str) -> Result<GameRecord, DomainError> {
        let board = generate_board(&self.word_pool[..], &mut self.board_rng(game_id))?;
        let record = self.store.insert(game_id, &GameState::new(board)).await?;
        info!(game_id = %record.id, version = record.version, "game created");
        Ok(record)
    }

    /// Load a game, creating it first if the id is new.
    pub async fn create_or_join(&self, raw_id: &str) -> Result<GameRecord, AppError> {
        let game_id = normalize_game_id(raw_id)?;

        if let Some(record) = self.store.find(&game_id).await? {
            debug!(game_id = %game_id, version = record.version, "joined existing game");
            return Ok(record);
        }

        match self.insert_new(&game_id).await {
            Ok(record) => {
                self.publish(&record).await?;
                Ok(record)
            }
            Err(DomainError::Conflict(ConflictKind::GameExists, _)) => {
                debug!(game_id = %game_id, "lost creation race; joining");
                Ok(self.require(&game_id).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create a game under a freshly generated code.
    pub async fn create_game(&self) -> Result<GameRecord, AppError> {
        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = generate_game_code(&mut rand::rng(), attempt);
            match self.insert_new(&code).await {
                Ok(record) => {
                    self.publish(&record).await?;
                    return Ok(record);
                }
                Err(DomainError::Conflict(ConflictKind::GameExists, _)) => {
                    debug!(code = %code, attempt, "game code taken");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::conflict(
            ErrorCode::GameExists,
            "Could not find a free game code",
        ))
    }

    pub async fn load(&self, game_id: &str) -> Result<GameRecord, AppError> {
        let game_id = normalize_game_id(game_id)?;
        Ok(self.require(&game_id).await?)
    }

    pub async fn reveal(
        &self,
        game_id: &str,
        index: usize,
        expected_version: Option<i32>,
    ) -> Result<MutationOutcome, AppError> {
        self.mutate(game_id, expected_version, |state| {
            engine::reveal_cell(state, index)
        })
        .await
    }

    /// Submit a clue typed by a human spymaster.
    pub async fn submit_clue(
        &self,
        game_id: &str,
        word: &str,
        count: i64,
        expected_version: Option<i32>,
    ) -> Result<MutationOutcome, AppError> {
        let clue = normalize_manual(word, count)?;
        self.mutate(game_id, expected_version, |state| {
            engine::submit_clue(state, &clue.word, clue.count)
        })
        .await
    }

    pub async fn end_turn(
        &self,
        game_id: &str,
        expected_version: Option<i32>,
    ) -> Result<MutationOutcome, AppError> {
        self.mutate(game_id, expected_version, engine::end_turn).await
    }

    /// Ask the clue generator for a clue and apply it.
    ///
    /// The generator result is only applied if the game is still awaiting a
    /// clue from the same team once it arrives; otherwise `STALE_CLUE`.
    pub async fn request_clue(&self, game_id: &str) -> Result<MutationOutcome, AppError> {
        let game_id = normalize_game_id(game_id)?;
        let before = self.require(&game_id).await?;

        if before.state.winner.is_some() {
            return Err(
                DomainError::validation(ValidationKind::GameOver, "The game is over").into(),
            );
        }
        if before.state.current_clue.is_some() {
            return Err(DomainError::validation(
                ValidationKind::ClueAlreadyActive,
                "A clue is already active this turn",
            )
            .into());
        }

        let team = before.state.current_team;
        let request = ClueRequest {
            board: before.state.board.clone(),
            team,
        };
        let raw = match tokio::time::timeout(self.config.clue_timeout, self.generator.suggest(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout),
        };
        if let Err(e) = &raw {
            warn!(game_id = %game_id, generator = self.generator.name(), error = %e, "clue generator failed");
        }

        let adapted = adapt(raw);
        if let Some(warning) = adapted.warning {
            warn!(
                game_id = %game_id,
                word = %adapted.clue.word,
                warning = warning.message(),
                "using fallback clue"
            );
        }

        let clue = adapted.clue;
        let mut outcome = self
            .mutate(&game_id, None, |state| {
                if state.winner.is_some()
                    || state.current_clue.is_some()
                    || state.current_team != team
                {
                    return Err(DomainError::validation(
                        ValidationKind::StaleClue,
                        "The game moved on while the clue was being generated",
                    ));
                }
                engine::submit_clue(state, &clue.word, clue.count)
            })
            .await?;
        outcome.warning = adapted.warning;
        Ok(outcome)
    }

    /// Run `request_clue` as a background task the caller may abandon.
    pub fn spawn_clue_request(self: &Arc<Self>, game_id: &str) -> ClueTask {
        let service = Arc::clone(self);
        let game_id = game_id.to_string();
        ClueTask {
            handle: tokio::spawn(async move { service.request_clue(&game_id).await }),
        }
    }

    async fn mutate<F>(
        &self,
        game_id: &str,
        expected_version: Option<i32>,
        compute: F,
    ) -> Result<MutationOutcome, AppError>
    where
        F: Fn(&GameState) -> Result<GameState, DomainError>,
    {
        let game_id = normalize_game_id(game_id)?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let before = self.require(&game_id).await?;

            if let Some(expected) = expected_version {
                if before.version != expected {
                    return Err(AppError::conflict(
                        ErrorCode::OptimisticLock,
                        format!(
                            "Game lock version mismatch: expected {}, but game has version {}",
                            expected, before.version
                        ),
                    ));
                }
            }

            let next = compute(&before.state)?;

            match self.store.update(&game_id, before.version, &next).await {
                Ok(record) => {
                    let transitions = derive_game_transitions(&before.state, &record.state);
                    log_transitions(&record, &transitions);
                    self.publish(&record).await?;
                    return Ok(MutationOutcome {
                        record,
                        transitions,
                        warning: None,
                    });
                }
                Err(e)
                    if e.is_optimistic_lock()
                        && expected_version.is_none()
                        && attempt < MAX_MUTATION_ATTEMPTS =>
                {
                    debug!(game_id = %game_id, attempt, "optimistic lock conflict; retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn log_transitions(record: &GameRecord, transitions: &[GameTransition]) {
    for transition in transitions {
        match transition {
            GameTransition::ClueGiven { word, count } => {
                info!(game_id = %record.id, version = record.version, word = %word, count, "clue given");
            }
            GameTransition::CellRevealed { index, color } => {
                info!(game_id = %record.id, version = record.version, index, color = ?color, "cell revealed");
            }
            GameTransition::GameWon { winner } => {
                info!(game_id = %record.id, version = record.version, winner = %winner, "game won");
            }
            GameTransition::TurnPassed { to } => {
                info!(game_id = %record.id, version = record.version, to = %to, "turn passed");
            }
        }
    }
}

/// Handle on a background clue request.
pub struct ClueTask {
    handle: JoinHandle<Result<MutationOutcome, AppError>>,
}

impl ClueTask {
    /// Abort the request. A clue that has not been written yet never will be.
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<MutationOutcome, AppError> {
        self.handle
            .await
            .map_err(|e| AppError::internal(format!("clue task did not complete: {e}")))?
    }
}
