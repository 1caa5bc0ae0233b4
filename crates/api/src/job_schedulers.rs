use crate::scheduling::{
    extend_schedules::ExtendSchedulesUseCase, scan_reminders::ScanRemindersUseCase,
};
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use campus_scheduler_infra::CampusContext;
use std::time::Duration;

/// Seconds until the next minute boundary, shifted back by
/// `secs_before_min`. Aligning scans to the minute keeps the reminder
/// windows predictable across restarts.
pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Calendars extend in bulk, this job runs far less often than the scan
/// job below.
pub fn start_schedule_extension_job(ctx: CampusContext) {
    actix_web::rt::spawn(async move {
        let mut extension_interval = interval(Duration::from_millis(
            ctx.config.scheduling.extension_job_interval_millis,
        ));
        loop {
            extension_interval.tick().await;

            let usecase = ExtendSchedulesUseCase;
            let _ = execute(usecase, &ctx).await;
        }
    });
}

pub fn start_reminder_scan_job(ctx: CampusContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut scan_interval = interval(Duration::from_millis(
            ctx.config.reminders.scan_job_interval_millis,
        ));
        loop {
            scan_interval.tick().await;

            let usecase = ScanRemindersUseCase;
            let _ = execute(usecase, &ctx).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
    }
}
