//! Repositories: domain records over storage.

pub mod games;
pub mod memory;

pub use games::{GameRecord, GameStore, SeaGameStore};
pub use memory::MemoryGameStore;
