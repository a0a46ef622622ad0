//! Per-game broadcast hub for committed game records.
//!
//! Each game id owns one `tokio::sync::broadcast` channel. Publishers push
//! immutable `Arc<GameRecord>` snapshots; subscribers receive them in order
//! and skip anything not newer than what they already applied. A channel
//! lives only while it has subscribers.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, trace};

use crate::errors::domain::DomainError;
use crate::repos::games::GameRecord;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Fans committed game records out to observers.
#[async_trait]
pub trait GameNotifier: Send + Sync {
    async fn publish(&self, record: &GameRecord) -> Result<(), DomainError>;
}

type Channels = DashMap<String, broadcast::Sender<Arc<GameRecord>>>;

pub struct GameHub {
    channels: Arc<Channels>,
    capacity: usize,
}

impl Default for GameHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl GameHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, game_id: &str) -> GameSubscription {
        let rx = self
            .channels
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        GameSubscription {
            game_id: game_id.to_string(),
            rx,
            last_version: None,
            _prune: PruneOnDrop {
                game_id: game_id.to_string(),
                channels: Arc::downgrade(&self.channels),
            },
        }
    }

    /// Send a record to every current subscriber of its game.
    /// Returns how many subscribers it reached.
    pub fn broadcast(&self, record: &GameRecord) -> usize {
        let delivered = match self.channels.get(&record.id) {
            Some(tx) => tx.send(Arc::new(record.clone())).unwrap_or(0),
            None => 0,
        };
        if delivered == 0 {
            self.channels
                .remove_if(&record.id, |_, tx| tx.receiver_count() == 0);
        }
        trace!(game_id = %record.id, version = record.version, delivered, "broadcast game record");
        delivered
    }

    pub fn subscriber_count(&self, game_id: &str) -> usize {
        self.channels
            .get(game_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[async_trait]
impl GameNotifier for GameHub {
    async fn publish(&self, record: &GameRecord) -> Result<(), DomainError> {
        self.broadcast(record);
        Ok(())
    }
}

/// Cancellable handle on one game's updates. Dropping it unsubscribes.
pub struct GameSubscription {
    game_id: String,
    rx: broadcast::Receiver<Arc<GameRecord>>,
    last_version: Option<i32>,
    // Declared after `rx` so the receiver is gone when it runs.
    _prune: PruneOnDrop,
}

/// Removes the game's channel once its last receiver is dropped.
struct PruneOnDrop {
    game_id: String,
    channels: Weak<Channels>,
}

impl Drop for PruneOnDrop {
    fn drop(&mut self) {
        if let Some(channels) = self.channels.upgrade() {
            if channels
                .remove_if(&self.game_id, |_, tx| tx.receiver_count() == 0)
                .is_some()
            {
                trace!(game_id = %self.game_id, "pruned idle game channel");
            }
        }
    }
}

impl GameSubscription {
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Mark a version as already applied (e.g. the snapshot sent on connect).
    pub fn mark_seen(&mut self, version: i32) {
        if self.last_version.is_none_or(|v| version > v) {
            self.last_version = Some(version);
        }
    }

    fn accept(&mut self, record: Arc<GameRecord>) -> Option<Arc<GameRecord>> {
        if self.last_version.is_some_and(|v| record.version <= v) {
            return None;
        }
        self.last_version = Some(record.version);
        Some(record)
    }

    /// Next record newer than anything seen so far; `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<Arc<GameRecord>> {
        loop {
            match self.rx.recv().await {
                Ok(record) => {
                    if let Some(record) = self.accept(record) {
                        return Some(record);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(game_id = %self.game_id, skipped, "subscriber lagged; jumping to newest");
                    if let Some(record) = self.drain_to_newest() {
                        return Some(record);
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn drain_to_newest(&mut self) -> Option<Arc<GameRecord>> {
        let mut newest = None;
        loop {
            match self.rx.try_recv() {
                Ok(record) => newest = Some(record),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        newest.and_then(|record| self.accept(record))
    }

    pub fn cancel(self) {}
}
