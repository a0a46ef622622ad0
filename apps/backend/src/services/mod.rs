pub mod game_session;

pub use game_session::{ClueTask, GameSessionService, MutationOutcome, SessionConfig};
