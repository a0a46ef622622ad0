// Store and notifier doubles that inject failures around the real memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use codenames_backend::domain::state::GameState;
use codenames_backend::errors::domain::{DomainError, InfraErrorKind};
use codenames_backend::repos::{GameRecord, GameStore, MemoryGameStore};
use codenames_backend::ws::GameNotifier;

/// Before each of the next `races` updates, another writer commits first,
/// so the caller's conditional write loses.
pub struct RacingStore {
    pub inner: Arc<MemoryGameStore>,
    races: AtomicUsize,
    updates: AtomicUsize,
}

impl RacingStore {
    pub fn new(races: usize) -> Self {
        Self {
            inner: Arc::new(MemoryGameStore::new()),
            races: AtomicUsize::new(races),
            updates: AtomicUsize::new(0),
        }
    }

    /// Update attempts made by callers (racing writes excluded).
    pub fn update_attempts(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStore for RacingStore {
    async fn find(&self, game_id: &str) -> Result<Option<GameRecord>, DomainError> {
        self.inner.find(game_id).await
    }

    async fn insert(&self, game_id: &str, state: &GameState) -> Result<GameRecord, DomainError> {
        self.inner.insert(game_id, state).await
    }

    async fn update(
        &self,
        game_id: &str,
        expected_version: i32,
        state: &GameState,
    ) -> Result<GameRecord, DomainError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let race = self
            .races
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if race {
            if let Some(current) = self.inner.find(game_id).await? {
                self.inner
                    .update(game_id, current.version, &current.state)
                    .await?;
            }
        }
        self.inner.update(game_id, expected_version, state).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A store whose backend is unreachable.
pub struct DownStore;

#[async_trait]
impl GameStore for DownStore {
    async fn find(&self, _game_id: &str) -> Result<Option<GameRecord>, DomainError> {
        Err(down())
    }

    async fn insert(&self, _game_id: &str, _state: &GameState) -> Result<GameRecord, DomainError> {
        Err(down())
    }

    async fn update(
        &self,
        _game_id: &str,
        _expected_version: i32,
        _state: &GameState,
    ) -> Result<GameRecord, DomainError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(down())
    }
}

fn down() -> DomainError {
    DomainError::infra(InfraErrorKind::DbUnavailable, "connection refused")
}

/// Notifier that always fails after the write has committed.
pub struct FailingNotifier;

#[async_trait]
impl GameNotifier for FailingNotifier {
    async fn publish(&self, _record: &GameRecord) -> Result<(), DomainError> {
        Err(DomainError::infra(
            InfraErrorKind::NotifierUnavailable,
            "broker unreachable",
        ))
    }
}
