use actix_web::{web, App, HttpServer};
use codenames_backend::config::AppConfig;
use codenames_backend::infra::state::build_state;
use codenames_backend::middleware::cors::cors_middleware;
use codenames_backend::middleware::request_trace::RequestTrace;
use codenames_backend::middleware::structured_logger::StructuredLogger;
use codenames_backend::middleware::trace_span::TraceSpan;
use codenames_backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let (host, port) = (config.host.clone(), config.port);
    let cors_origins = config.cors_allowed_origins.clone();

    let app_state = match build_state().with_config(config).build().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %host,
        port,
        clue_generator = app_state.generator().name(),
        "starting codenames backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
