//! In-process `GameStore` with the same conditional-update semantics as the
//! SeaORM store. Used by tests and when no database is configured.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;

use crate::domain::state::GameState;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::games::{GameRecord, GameStore};

#[derive(Default)]
pub struct MemoryGameStore {
    games: DashMap<String, GameRecord>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn find(&self, game_id: &str) -> Result<Option<GameRecord>, DomainError> {
        Ok(self.games.get(game_id).map(|r| r.value().clone()))
    }

    async fn insert(&self, game_id: &str, state: &GameState) -> Result<GameRecord, DomainError> {
        match self.games.entry(game_id.to_string()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::GameExists,
                format!("Game {game_id} already exists"),
            )),
            Entry::Vacant(slot) => {
                let now = OffsetDateTime::now_utc();
                let record = GameRecord {
                    id: game_id.to_string(),
                    state: state.clone(),
                    version: 1,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update(
        &self,
        game_id: &str,
        expected_version: i32,
        state: &GameState,
    ) -> Result<GameRecord, DomainError> {
        // The shard lock is held for the whole compare-and-swap.
        let mut entry = self.games.get_mut(game_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })?;

        if entry.version != expected_version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Game was modified concurrently (expected version {}, actual version {}). Please refresh and retry.",
                    expected_version, entry.version
                ),
            ));
        }

        entry.state = state.clone();
        entry.version += 1;
        entry.updated_at = OffsetDateTime::now_utc();
        Ok(entry.value().clone())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
