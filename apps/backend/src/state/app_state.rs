use std::sync::Arc;

use crate::ai::ClueGenerator;
use crate::config::AppConfig;
use crate::repos::games::GameStore;
use crate::services::game_session::GameSessionService;
use crate::ws::hub::GameHub;

/// Application state shared by every handler and WebSocket session.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    hub: Arc<GameHub>,
    sessions: Arc<GameSessionService>,
}

impl AppState {
    pub fn new(config: AppConfig, hub: Arc<GameHub>, sessions: Arc<GameSessionService>) -> Self {
        Self {
            config: Arc::new(config),
            hub,
            sessions,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fan-out point WebSocket sessions subscribe to.
    pub fn hub(&self) -> &Arc<GameHub> {
        &self.hub
    }

    pub fn sessions(&self) -> &Arc<GameSessionService> {
        &self.sessions
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        self.sessions.store()
    }

    pub fn generator(&self) -> &Arc<dyn ClueGenerator> {
        self.sessions.generator()
    }
}
