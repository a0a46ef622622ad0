use std::sync::Arc;

use tracing::info;

use crate::ai::{create_generator, ClueGenerator};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::games::{GameStore, SeaGameStore};
use crate::repos::memory::MemoryGameStore;
use crate::services::game_session::{GameSessionService, SessionConfig};
use crate::state::app_state::AppState;
use crate::ws::hub::{GameHub, GameNotifier};

/// Builder for creating AppState instances (used in both tests and main).
///
/// Anything not injected explicitly is derived from the config: a SeaORM
/// store when `database_url` is set (in-memory otherwise), the generator
/// named by `ollama_url`, and the hub as notifier.
#[derive(Default)]
pub struct StateBuilder {
    config: Option<AppConfig>,
    store: Option<Arc<dyn GameStore>>,
    hub: Option<Arc<GameHub>>,
    notifier: Option<Arc<dyn GameNotifier>>,
    generator: Option<Arc<dyn ClueGenerator>>,
    word_pool: Option<Vec<String>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_hub(mut self, hub: Arc<GameHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Replace the hub as the coordinator's notifier. WebSocket sessions
    /// still subscribe to the hub.
    pub fn with_notifier(mut self, notifier: Arc<dyn GameNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn ClueGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_word_pool(mut self, words: Vec<String>) -> Self {
        self.word_pool = Some(words);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let config = self.config.unwrap_or_default();

        let store: Arc<dyn GameStore> = match (self.store, &config.database_url) {
            (Some(store), _) => store,
            (None, Some(url)) => Arc::new(SeaGameStore::new(bootstrap_db(url).await?)),
            (None, None) => {
                info!("DATABASE_URL not set; games are kept in memory");
                Arc::new(MemoryGameStore::new())
            }
        };

        let generator = self.generator.unwrap_or_else(|| {
            create_generator(
                config.ollama_url.as_deref(),
                &config.ollama_model,
                config.clue_timeout,
            )
        });

        let word_pool = match self.word_pool {
            Some(words) => words,
            None => config.load_word_pool()?,
        };

        let hub = self.hub.unwrap_or_default();
        let notifier: Arc<dyn GameNotifier> = match self.notifier {
            Some(notifier) => notifier,
            None => hub.clone(),
        };

        let session_config = SessionConfig {
            clue_timeout: config.clue_timeout,
            base_seed: config.board_seed,
        };
        let sessions = Arc::new(GameSessionService::new(
            store,
            notifier,
            generator,
            word_pool,
            session_config,
        ));

        Ok(AppState::new(config, hub, sessions))
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
