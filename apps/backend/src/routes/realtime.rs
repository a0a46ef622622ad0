use actix_web::web;

use crate::ws::session;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/games/{game_id}").route(web::get().to(session::upgrade)));
}
