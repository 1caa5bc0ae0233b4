mod update_session_status;

use actix_web::web;
use update_session_status::update_session_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/sessions/{session_id}/status",
        web::put().to(update_session_status_controller),
    );
}
