mod create_live_class;
mod get_class_sessions;
mod get_live_class;
mod set_live_class_status;

use actix_web::web;
use create_live_class::create_live_class_controller;
use get_class_sessions::get_class_sessions_controller;
use get_live_class::get_live_class_controller;
use set_live_class_status::set_live_class_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/live-classes", web::post().to(create_live_class_controller));
    cfg.route(
        "/live-classes/{live_class_id}",
        web::get().to(get_live_class_controller),
    );
    cfg.route(
        "/live-classes/{live_class_id}/status",
        web::put().to(set_live_class_status_controller),
    );
    cfg.route(
        "/live-classes/{live_class_id}/sessions",
        web::get().to(get_class_sessions_controller),
    );
}
