// App and state builders shared by the integration suites.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use codenames_backend::ai::ClueGenerator;
use codenames_backend::config::AppConfig;
use codenames_backend::infra::state::build_state;
use codenames_backend::repos::{GameStore, MemoryGameStore};
use codenames_backend::routes;
use codenames_backend::state::app_state::AppState;
use codenames_backend::ws::GameHub;
use codenames_backend::{GameSessionService, RequestTrace, SessionConfig, StructuredLogger, TraceSpan};

/// Boards in tests are reproducible per game id.
pub const TEST_SEED: u64 = 7;

pub fn test_config() -> AppConfig {
    AppConfig {
        board_seed: Some(TEST_SEED),
        ..AppConfig::default()
    }
}

/// In-memory state with the given generator.
pub async fn memory_state(generator: Arc<dyn ClueGenerator>) -> AppState {
    build_state()
        .with_config(test_config())
        .with_store(Arc::new(MemoryGameStore::new()))
        .with_generator(generator)
        .build()
        .await
        .expect("build memory state")
}

/// A coordinator over `store` that publishes to `hub`.
pub fn service_with(
    store: Arc<dyn GameStore>,
    hub: Arc<GameHub>,
    generator: Arc<dyn ClueGenerator>,
) -> GameSessionService {
    GameSessionService::new(
        store,
        hub,
        generator,
        codenames_backend::domain::words::DEFAULT_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect(),
        SessionConfig {
            base_seed: Some(TEST_SEED),
            ..SessionConfig::default()
        },
    )
}

/// Build the production `App` (routes plus middleware) around `state`.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::App::new()
            .wrap(codenames_backend::StructuredLogger)
            .wrap(codenames_backend::TraceSpan)
            .wrap(codenames_backend::RequestTrace)
            .app_data(actix_web::web::Data::new($state))
            .configure(codenames_backend::routes::configure)
    };
}

/// Start a real HTTP server on an ephemeral port, for WebSocket clients.
pub async fn start_test_server(
    state: AppState,
) -> Result<
    (
        actix_web::dev::ServerHandle,
        std::net::SocketAddr,
        tokio::task::JoinHandle<Result<(), std::io::Error>>,
    ),
    Box<dyn std::error::Error>,
> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state_data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let join = tokio::spawn(server);

    Ok((server_handle, addr, join))
}
