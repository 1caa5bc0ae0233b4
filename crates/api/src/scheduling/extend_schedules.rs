use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::extend_schedules::APIResponse;
use campus_scheduler_domain::{
    cycle_length, AccessPolicy, ClassSession, LiveClass, SessionSlot, SessionStatus,
};
use campus_scheduler_infra::CampusContext;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::warn;

pub async fn extend_schedules_controller(
    http_req: HttpRequest,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = ExtendSchedulesUseCase;

    execute(usecase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                classes_extended: report.classes_extended,
                classes_skipped: report.classes_skipped,
                classes_failed: report.classes_failed,
                sessions_created: report.sessions_created,
            })
        })
        .map_err(CampusError::from)
}

/// Walks every active `LiveClass` and tops its forward calendar back up to
/// the configured buffer of future days. Classes whose calendar is already
/// full are skipped, which makes repeated invocation a no-op.
#[derive(Debug)]
pub struct ExtendSchedulesUseCase;

#[derive(Debug)]
pub struct ExtensionReport {
    pub classes_extended: usize,
    pub classes_skipped: usize,
    pub classes_failed: usize,
    pub sessions_created: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CampusError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ExtendSchedulesUseCase {
    type Response = ExtensionReport;

    type Error = UseCaseError;

    const NAME: &'static str = "ExtendSchedules";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let classes = ctx
            .repos
            .live_classes
            .find_all_active()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut report = ExtensionReport {
            classes_extended: 0,
            classes_skipped: 0,
            classes_failed: 0,
            sessions_created: 0,
        };

        // Classes are independent. One class failing to extend must not
        // affect the others in the same run.
        for class in classes {
            match extend_class_schedule(&class, ctx).await {
                Ok(ClassExtension::Skipped) => report.classes_skipped += 1,
                Ok(ClassExtension::Extended { sessions_created }) => {
                    report.classes_extended += 1;
                    report.sessions_created += sessions_created;
                }
                Err(e) => {
                    warn!(
                        "Unable to extend schedule for live class {}: {:?}",
                        class.id, e
                    );
                    report.classes_failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[derive(Debug)]
pub(crate) enum ClassExtension {
    /// The class still has at least the low-water mark of buffered days
    Skipped,
    Extended { sessions_created: usize },
}

#[derive(Debug)]
pub(crate) enum ClassExtensionError {
    EmptyCatalog,
    CatalogUnavailable,
    StorageError,
}

fn datetime_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    DateTime::<Utc>::from_utc(date.and_time(time), Utc).timestamp_millis()
}

/// Appends the next extension batch of sessions for a single class, unless
/// its calendar already holds enough buffered days. The persisted cycle
/// cursor is advanced in step with the number of scheduled days so the
/// rotation resumes correctly on the next run.
pub(crate) async fn extend_class_schedule(
    class: &LiveClass,
    ctx: &CampusContext,
) -> Result<ClassExtension, ClassExtensionError> {
    let scheduling = &ctx.config.scheduling;
    let slots = SessionSlot::all();

    let now = ctx.sys.get_timestamp_millis();
    let today = Utc.timestamp_millis(now).date().naive_utc();
    let today_start = datetime_millis(today, NaiveTime::from_hms(0, 0, 0));

    let future_sessions = ctx
        .repos
        .class_sessions
        .find_future_by_class(&class.id, today_start)
        .await;

    let days_remaining = future_sessions.len() / slots.len();
    if days_remaining >= scheduling.low_water_mark_days {
        return Ok(ClassExtension::Skipped);
    }

    let tomorrow = today + Duration::days(1);
    let start_date = match future_sessions.iter().map(|s| s.scheduled_at).max() {
        Some(latest) => {
            let after_latest = Utc.timestamp_millis(latest).date().naive_utc() + Duration::days(1);
            // Never start in the past
            after_latest.max(tomorrow)
        }
        None => tomorrow,
    };

    let catalog = ctx
        .ports
        .content_catalog
        .list_items(&class.content_source)
        .await
        .map_err(|_| ClassExtensionError::CatalogUnavailable)?;
    if catalog.is_empty() {
        return Err(ClassExtensionError::EmptyCatalog);
    }

    let cycle_len = cycle_length(
        catalog.len(),
        scheduling.min_cycle_length,
        scheduling.max_cycle_length,
    );
    let policy = AccessPolicy::new(scheduling.free_threshold);

    let mut sessions = Vec::with_capacity(scheduling.extension_length_days * slots.len());
    for day in 0..scheduling.extension_length_days {
        let content_index = (class.cycle_cursor + day) % cycle_len;
        // A forced minimum cycle can be longer than the catalog itself.
        // Positions past the end wrap onto the start.
        let item = &catalog[content_index % catalog.len()];
        let date = start_date + Duration::days(day as i64);

        for slot in slots.iter() {
            sessions.push(ClassSession {
                id: Default::default(),
                live_class_id: class.id.clone(),
                content_item_id: item.id.clone(),
                slot: *slot,
                scheduled_at: datetime_millis(date, slot.start_time()),
                status: SessionStatus::Scheduled,
                is_free: policy.is_free(item.ordinal_position),
                capacity: scheduling.default_capacity,
                remaining: scheduling.default_capacity,
            });
        }
    }

    let sessions_created = sessions.len();
    ctx.repos
        .class_sessions
        .insert_many(&sessions)
        .await
        .map_err(|_| ClassExtensionError::StorageError)?;

    let mut class = class.clone();
    class.advance_cursor(scheduling.extension_length_days, cycle_len);
    ctx.repos
        .live_classes
        .save(&class)
        .await
        .map_err(|_| ClassExtensionError::StorageError)?;

    Ok(ClassExtension::Extended { sessions_created })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_scheduler_domain::{ContentItem, ContentSourceRef};
    use campus_scheduler_infra::{InMemoryContentCatalog, ISys};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Mon Mar 1 2021 00:00:00 UTC
    const MAR_1_2021: i64 = 1614556800000;
    const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

    struct StaticTimeSys {
        millis: i64,
    }
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.millis
        }
    }

    struct TestContext {
        ctx: CampusContext,
        catalog: Arc<InMemoryContentCatalog>,
    }

    fn setup() -> TestContext {
        let mut ctx = CampusContext::create_inmemory();
        let catalog = Arc::new(InMemoryContentCatalog::new());
        ctx.ports.content_catalog = catalog.clone();
        ctx.sys = Arc::new(StaticTimeSys { millis: MAR_1_2021 });
        ctx.config.scheduling.low_water_mark_days = 7;
        ctx.config.scheduling.extension_length_days = 30;
        ctx.config.scheduling.min_cycle_length = 1;
        ctx.config.scheduling.max_cycle_length = 30;
        ctx.config.scheduling.free_threshold = 2;
        TestContext { ctx, catalog }
    }

    fn content_items(count: usize) -> Vec<ContentItem> {
        (0..count)
            .map(|i| ContentItem {
                id: Default::default(),
                ordinal_position: i,
                title: format!("Lesson {}", i + 1),
            })
            .collect()
    }

    async fn insert_class_with_catalog(
        test_ctx: &TestContext,
        items: Vec<ContentItem>,
    ) -> LiveClass {
        let class = LiveClass::new(ContentSourceRef::Course(Default::default()));
        test_ctx
            .catalog
            .insert_items(&class.content_source, items);
        test_ctx
            .ctx
            .repos
            .live_classes
            .insert(&class)
            .await
            .unwrap();
        class
    }

    fn session_date(session: &ClassSession) -> NaiveDate {
        Utc.timestamp_millis(session.scheduled_at).date().naive_utc()
    }

    #[actix_web::main]
    #[test]
    async fn generates_the_full_extension_batch_for_a_new_class() {
        let test_ctx = setup();
        let items = content_items(5);
        let class = insert_class_with_catalog(&test_ctx, items.clone()).await;

        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_extended, 1);
        assert_eq!(report.classes_skipped, 0);
        assert_eq!(report.classes_failed, 0);
        assert_eq!(report.sessions_created, 90);

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;
        assert_eq!(sessions.len(), 90);

        // 30 scheduled days rotate a 5 item catalog 6 times, every item is
        // used for 6 days of 3 slots each
        let mut uses_per_item: HashMap<String, usize> = HashMap::new();
        for session in &sessions {
            *uses_per_item
                .entry(session.content_item_id.as_string())
                .or_insert(0) += 1;
        }
        assert_eq!(uses_per_item.len(), 5);
        for item in &items {
            assert_eq!(uses_per_item[&item.id.as_string()], 18);
        }

        let class = test_ctx.ctx.repos.live_classes.find(&class.id).await.unwrap();
        assert_eq!(class.cycle_cursor, 0);
    }

    #[actix_web::main]
    #[test]
    async fn is_idempotent_when_the_calendar_is_already_full() {
        let test_ctx = setup();
        let class = insert_class_with_catalog(&test_ctx, content_items(5)).await;

        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_extended, 1);

        // No time has passed, the calendar is still full
        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_extended, 0);
        assert_eq!(report.classes_skipped, 1);
        assert_eq!(report.sessions_created, 0);

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;
        assert_eq!(sessions.len(), 90);
    }

    #[actix_web::main]
    #[test]
    async fn future_sessions_form_a_contiguous_run_of_days() {
        let test_ctx = setup();
        let class = insert_class_with_catalog(&test_ctx, content_items(5)).await;

        execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;

        let mut sessions_per_day: HashMap<NaiveDate, Vec<SessionSlot>> = HashMap::new();
        for session in &sessions {
            sessions_per_day
                .entry(session_date(session))
                .or_insert_with(Vec::new)
                .push(session.slot);
        }

        let mut days = sessions_per_day.keys().copied().collect::<Vec<_>>();
        days.sort();
        assert_eq!(days.len(), 30);
        // Generation starts tomorrow and leaves no gaps
        assert_eq!(days[0], NaiveDate::from_ymd(2021, 3, 2));
        for window in days.windows(2) {
            assert_eq!(window[0] + Duration::days(1), window[1]);
        }

        // Every day carries one session per slot
        for slots in sessions_per_day.values() {
            let mut slots = slots.clone();
            slots.sort_by_key(|s| s.start_time());
            assert_eq!(slots, SessionSlot::all().to_vec());
        }
    }

    #[actix_web::main]
    #[test]
    async fn resumes_the_rotation_where_the_last_run_stopped() {
        let mut test_ctx = setup();
        let items = content_items(7);
        let class = insert_class_with_catalog(&test_ctx, items.clone()).await;

        execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        let class_after_first = test_ctx.ctx.repos.live_classes.find(&class.id).await.unwrap();
        assert_eq!(class_after_first.cycle_cursor, 30 % 7);

        // 26 days later most of the buffer has been consumed
        test_ctx.ctx.sys = Arc::new(StaticTimeSys {
            millis: MAR_1_2021 + 26 * DAY_MILLIS,
        });
        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_extended, 1);

        let class_after_second = test_ctx.ctx.repos.live_classes.find(&class.id).await.unwrap();
        assert_eq!(class_after_second.cycle_cursor, (30 + 30) % 7);

        // The second batch starts the day after the previous latest
        // session. Day 31 after Mar 1 is Apr 1.
        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;
        assert_eq!(sessions.len(), 180);
        let mut days = sessions
            .iter()
            .map(session_date)
            .collect::<Vec<_>>();
        days.sort();
        days.dedup();
        assert_eq!(days.len(), 60);
        for window in days.windows(2) {
            assert_eq!(window[0] + Duration::days(1), window[1]);
        }

        // The first day of the second batch replays the item the cursor
        // pointed at
        let first_new_day = NaiveDate::from_ymd(2021, 4, 1);
        let new_day_session = sessions
            .iter()
            .find(|s| session_date(s) == first_new_day)
            .unwrap();
        assert_eq!(
            new_day_session.content_item_id,
            items[30 % 7].id
        );
    }

    #[actix_web::main]
    #[test]
    async fn applies_the_access_policy_to_each_catalog_position() {
        let test_ctx = setup();
        let items = content_items(5);
        let class = insert_class_with_catalog(&test_ctx, items.clone()).await;

        execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;

        let free_item_ids = items
            .iter()
            .filter(|i| i.ordinal_position < 2)
            .map(|i| i.id.as_string())
            .collect::<Vec<_>>();
        for session in &sessions {
            assert_eq!(
                session.is_free,
                free_item_ids.contains(&session.content_item_id.as_string())
            );
        }
    }

    #[actix_web::main]
    #[test]
    async fn caps_the_rotation_for_long_catalogs() {
        let test_ctx = setup();
        let items = content_items(50);
        let class = insert_class_with_catalog(&test_ctx, items).await;

        execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;

        // Only the first 30 of 50 items are exposed in this rotation
        let mut used_items = sessions
            .iter()
            .map(|s| s.content_item_id.as_string())
            .collect::<Vec<_>>();
        used_items.sort();
        used_items.dedup();
        assert_eq!(used_items.len(), 30);

        let class = test_ctx.ctx.repos.live_classes.find(&class.id).await.unwrap();
        assert_eq!(class.cycle_cursor, 0);
    }

    #[actix_web::main]
    #[test]
    async fn a_failing_class_does_not_affect_the_others() {
        let test_ctx = setup();
        // No catalog items are seeded for this class
        let class_without_catalog = LiveClass::new(ContentSourceRef::Playlist(Default::default()));
        test_ctx
            .ctx
            .repos
            .live_classes
            .insert(&class_without_catalog)
            .await
            .unwrap();
        let healthy_class = insert_class_with_catalog(&test_ctx, content_items(5)).await;

        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_failed, 1);
        assert_eq!(report.classes_extended, 1);

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&healthy_class.id, MAR_1_2021)
            .await;
        assert_eq!(sessions.len(), 90);
        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class_without_catalog.id, MAR_1_2021)
            .await;
        assert!(sessions.is_empty());

        // The failed class keeps its cursor untouched and is retried on
        // the next run
        let class = test_ctx
            .ctx
            .repos
            .live_classes
            .find(&class_without_catalog.id)
            .await
            .unwrap();
        assert_eq!(class.cycle_cursor, 0);
    }

    #[actix_web::main]
    #[test]
    async fn inactive_classes_are_never_extended() {
        let test_ctx = setup();
        let mut class = LiveClass::new(ContentSourceRef::Course(Default::default()));
        class.is_active = false;
        test_ctx
            .catalog
            .insert_items(&class.content_source, content_items(5));
        test_ctx.ctx.repos.live_classes.insert(&class).await.unwrap();

        let report = execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();
        assert_eq!(report.classes_extended, 0);
        assert_eq!(report.classes_skipped, 0);

        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;
        assert!(sessions.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn pads_the_rotation_for_catalogs_below_the_minimum() {
        let mut test_ctx = setup();
        test_ctx.ctx.config.scheduling.min_cycle_length = 4;
        test_ctx.ctx.config.scheduling.extension_length_days = 8;
        let items = content_items(3);
        let class = insert_class_with_catalog(&test_ctx, items.clone()).await;

        execute(ExtendSchedulesUseCase, &test_ctx.ctx).await.unwrap();

        // Cycle is padded to 4 positions, the position past the catalog
        // end wraps onto the first item
        let sessions = test_ctx
            .ctx
            .repos
            .class_sessions
            .find_future_by_class(&class.id, MAR_1_2021)
            .await;
        assert_eq!(sessions.len(), 24);

        let mut uses_per_item: HashMap<String, usize> = HashMap::new();
        for session in &sessions {
            *uses_per_item
                .entry(session.content_item_id.as_string())
                .or_insert(0) += 1;
        }
        // Days 0..8 use positions 0,1,2,0,0,1,2,0 of the padded cycle
        assert_eq!(uses_per_item[&items[0].id.as_string()], 4 * 3);
        assert_eq!(uses_per_item[&items[1].id.as_string()], 2 * 3);
        assert_eq!(uses_per_item[&items[2].id.as_string()], 2 * 3);

        let class = test_ctx.ctx.repos.live_classes.find(&class.id).await.unwrap();
        assert_eq!(class.cycle_cursor, 8 % 4);
    }
}
