//! Game repository: domain records over the games table.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::adapters::games_sea::{GameCreate, GameFields, GameUpdate};
use crate::domain::board::{Cell, Team};
use crate::domain::state::{Clue, GameState};
use crate::entities::games;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Game domain record
///
/// One persisted game: the authoritative state plus the optimistic-lock
/// version and timestamps. Converted from `games::Model` on load.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: String,
    pub state: GameState,
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Persistent store for game records.
///
/// `update` must be atomic: it succeeds only if the stored version still
/// equals `expected_version`, and bumps the version by one.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find(&self, game_id: &str) -> Result<Option<GameRecord>, DomainError>;

    /// Insert a brand new game. An existing id is `Conflict(GameExists)`.
    async fn insert(&self, game_id: &str, state: &GameState) -> Result<GameRecord, DomainError>;

    async fn update(
        &self,
        game_id: &str,
        expected_version: i32,
        state: &GameState,
    ) -> Result<GameRecord, DomainError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), DomainError>;
}

fn corrupt(game_id: &str, what: impl std::fmt::Display) -> DomainError {
    DomainError::infra(
        InfraErrorKind::DataCorruption,
        format!("Game {game_id} has an unreadable {what}"),
    )
}

impl TryFrom<games::Model> for GameRecord {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let board: Vec<Cell> =
            serde_json::from_value(model.board).map_err(|e| corrupt(&id, format!("board: {e}")))?;
        let current_team: Team = model
            .current_team
            .parse()
            .map_err(|e| corrupt(&id, format!("current_team: {e}")))?;
        let current_clue: Option<Clue> = model
            .current_clue
            .map(serde_json::from_value::<Clue>)
            .transpose()
            .map_err(|e| corrupt(&id, format!("current_clue: {e}")))?;
        let winner: Option<Team> = model
            .winner
            .as_deref()
            .map(str::parse::<Team>)
            .transpose()
            .map_err(|e| corrupt(&id, format!("winner: {e}")))?;
        let guesses_remaining = u32::try_from(model.guesses_remaining)
            .map_err(|_| corrupt(&id, "guesses_remaining"))?;
        let red_remaining =
            u32::try_from(model.red_remaining).map_err(|_| corrupt(&id, "red_remaining"))?;
        let blue_remaining =
            u32::try_from(model.blue_remaining).map_err(|_| corrupt(&id, "blue_remaining"))?;

        let state = GameState {
            board,
            current_team,
            current_clue,
            guesses_remaining,
            red_remaining,
            blue_remaining,
            winner,
        };
        state
            .check_invariants()
            .map_err(|violation| corrupt(&id, format!("state ({violation})")))?;

        Ok(GameRecord {
            id,
            state,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Encode a state into storable columns.
pub fn fields_from_state(state: &GameState) -> Result<GameFields, DomainError> {
    let encode_err = |e: serde_json::Error| {
        DomainError::infra(
            InfraErrorKind::Other("Encode".into()),
            format!("Failed to encode game state: {e}"),
        )
    };
    let out_of_range = |field: &str| {
        DomainError::infra(
            InfraErrorKind::Other("Encode".into()),
            format!("{field} does not fit its column"),
        )
    };

    Ok(GameFields {
        board: serde_json::to_value(&state.board).map_err(encode_err)?,
        current_team: state.current_team.as_str().to_string(),
        current_clue: state
            .current_clue
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(encode_err)?,
        guesses_remaining: i32::try_from(state.guesses_remaining)
            .map_err(|_| out_of_range("guesses_remaining"))?,
        red_remaining: i16::try_from(state.red_remaining)
            .map_err(|_| out_of_range("red_remaining"))?,
        blue_remaining: i16::try_from(state.blue_remaining)
            .map_err(|_| out_of_range("blue_remaining"))?,
        winner: state.winner.map(|t| t.as_str().to_string()),
    })
}

// Free functions (generic over the connection)

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<GameRecord>, DomainError> {
    games_adapter::find_by_id(conn, game_id)
        .await?
        .map(GameRecord::try_from)
        .transpose()
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    state: &GameState,
) -> Result<GameRecord, DomainError> {
    let dto = GameCreate {
        id: game_id.to_string(),
        fields: fields_from_state(state)?,
    };
    let game = games_adapter::create_game(conn, dto).await?;
    GameRecord::try_from(game)
}

/// Replace a game's state with optimistic locking.
///
/// `expected_version` must match the stored version; returns the record as
/// persisted (with the incremented version).
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
    expected_version: i32,
    state: &GameState,
) -> Result<GameRecord, DomainError> {
    let dto = GameUpdate {
        id: game_id.to_string(),
        expected_version,
        fields: fields_from_state(state)?,
    };
    let game = games_adapter::update_game(conn, dto).await?;
    GameRecord::try_from(game)
}

/// `GameStore` backed by SeaORM (Postgres or SQLite).
#[derive(Clone)]
pub struct SeaGameStore {
    db: DatabaseConnection,
}

impl SeaGameStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl GameStore for SeaGameStore {
    async fn find(&self, game_id: &str) -> Result<Option<GameRecord>, DomainError> {
        find_by_id(&self.db, game_id).await
    }

    async fn insert(&self, game_id: &str, state: &GameState) -> Result<GameRecord, DomainError> {
        create_game(&self.db, game_id, state).await
    }

    async fn update(
        &self,
        game_id: &str,
        expected_version: i32,
        state: &GameState,
    ) -> Result<GameRecord, DomainError> {
        update_game(&self.db, game_id, expected_version, state).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.db.ping().await.map_err(DomainError::from)
    }
}
