//! Realtime fan-out of committed game records over WebSockets.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{GameHub, GameNotifier, GameSubscription};
