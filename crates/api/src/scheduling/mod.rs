pub mod extend_schedules;
pub mod scan_reminders;

use actix_web::web;
use extend_schedules::extend_schedules_controller;
use scan_reminders::scan_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/scheduler/extend",
        web::post().to(extend_schedules_controller),
    );
    cfg.route(
        "/scheduler/scan-reminders",
        web::post().to(scan_reminders_controller),
    );
}
