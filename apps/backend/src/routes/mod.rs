use actix_web::web;

pub mod games;
pub mod health;
pub mod realtime;

/// Register every route. `main.rs` and the HTTP tests share this, with the
/// middleware stack wrapped around it by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Games routes: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Realtime routes: /api/ws/**
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
