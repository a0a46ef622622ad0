use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::ai::GeneratorStatus;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_error: Option<String>,
    clue_generator: GeneratorStatus,
    time: String,
}

/// Liveness plus collaborator status. The clue generator being down only
/// degrades clues, so it never fails the check; the store does.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (store, store_error) = match app_state.store().ping().await {
        Ok(()) => ("ok", None),
        Err(e) => ("error", Some(e.to_string())),
    };

    let clue_generator = app_state.generator().status().await;

    let response = HealthResponse {
        status: if store_error.is_none() { "ok" } else { "degraded" },
        app_version: env!("CARGO_PKG_VERSION"),
        store,
        store_error,
        clue_generator,
        time,
    };

    if response.store_error.is_some() {
        return Ok(HttpResponse::ServiceUnavailable().json(response));
    }
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
