use crate::error::CampusError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campus_scheduler_api_structs::scan_reminders::APIResponse;
use campus_scheduler_domain::{ClassSession, ReminderKind, ReminderRecord};
use campus_scheduler_infra::CampusContext;
use std::collections::{HashMap, HashSet};
use tracing::warn;

pub async fn scan_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<CampusContext>,
) -> Result<HttpResponse, CampusError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = ScanRemindersUseCase;

    execute(usecase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                sessions_inspected: report.sessions_inspected,
                reminders_sent: report.reminders_sent,
                send_failures: report.send_failures,
            })
        })
        .map_err(CampusError::from)
}

/// Inspects the sessions starting inside the lookahead horizon and
/// delivers every reminder kind that is due, at most once per (session,
/// kind, recipient). There is no catch-up for windows no scan landed in,
/// which bounds how stale a delivered reminder can be.
#[derive(Debug)]
pub struct ScanRemindersUseCase;

#[derive(Debug)]
pub struct ScanReport {
    pub sessions_inspected: usize,
    pub reminders_sent: usize,
    pub send_failures: usize,
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
impl UseCase for ScanRemindersUseCase {
    type Response = ScanReport;

    type Error = UseCaseError;

    const NAME: &'static str = "ScanReminders";

    async fn execute(&mut self, ctx: &CampusContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let horizon = now + ctx.config.reminders.lookahead_horizon_millis;
        let tolerance = ctx.config.reminders.tolerance_millis;

        let sessions = ctx
            .repos
            .class_sessions
            .find_scheduled_in_range(now, horizon)
            .await;

        let mut report = ScanReport {
            sessions_inspected: 0,
            reminders_sent: 0,
            send_failures: 0,
        };

        // Sessions of the same class share the active flag, look it up once
        let mut class_is_active: HashMap<String, bool> = HashMap::new();

        for session in sessions {
            let class_key = session.live_class_id.as_string();
            let active = match class_is_active.get(&class_key) {
                Some(active) => *active,
                None => {
                    let active = ctx
                        .repos
                        .live_classes
                        .find(&session.live_class_id)
                        .await
                        .map(|c| c.is_active)
                        .unwrap_or(false);
                    class_is_active.insert(class_key, active);
                    active
                }
            };
            // Inactive classes are never reminded
            if !active {
                continue;
            }

            report.sessions_inspected += 1;
            let time_until_session = session.scheduled_at - now;

            for kind in ReminderKind::all().iter() {
                if !kind.is_due(time_until_session, tolerance) {
                    continue;
                }
                match remind_session_recipients(&session, *kind, ctx).await {
                    Ok(outcome) => {
                        report.reminders_sent += outcome.sent;
                        report.send_failures += outcome.failed;
                    }
                    Err(e) => {
                        warn!(
                            "Unable to resolve recipients of session {} for {} reminder: {:?}",
                            session.id, kind, e
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}

struct SendOutcome {
    sent: usize,
    failed: usize,
}

/// Resolves the recipient set for one due (session, kind) pair and sends
/// to every recipient that has not been reminded yet. One recipient
/// failing never blocks the others.
async fn remind_session_recipients(
    session: &ClassSession,
    kind: ReminderKind,
    ctx: &CampusContext,
) -> anyhow::Result<SendOutcome> {
    let mut recipients = ctx
        .ports
        .access_grants
        .list_session_recipients(&session.id)
        .await?;
    recipients.extend(
        ctx.ports
            .access_grants
            .list_class_recipients(&session.live_class_id)
            .await?,
    );
    // Session grants and full-class grants can overlap
    let mut seen = HashSet::new();
    recipients.retain(|r| seen.insert(r.clone()));

    let mut outcome = SendOutcome { sent: 0, failed: 0 };
    for recipient in recipients {
        let already_sent = ctx
            .repos
            .reminder_records
            .find(&session.id, kind, &recipient)
            .await
            .is_some();
        if already_sent {
            continue;
        }

        if let Err(e) = ctx
            .ports
            .notification_sender
            .send(&recipient, kind, session)
            .await
        {
            warn!(
                "Unable to deliver {} reminder for session {} to recipient {}: {:?}",
                kind, session.id, recipient, e
            );
            outcome.failed += 1;
            continue;
        }

        let record = ReminderRecord {
            class_session_id: session.id.clone(),
            kind,
            recipient_id: recipient.clone(),
            sent_at: ctx.sys.get_timestamp_millis(),
        };
        // A false insert means a concurrent scan recorded this reminder
        // first. The send already happened either way.
        if let Err(e) = ctx.repos.reminder_records.insert(&record).await {
            warn!(
                "Reminder for session {} was delivered to {} but could not be recorded: {:?}",
                session.id, recipient, e
            );
        }
        outcome.sent += 1;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_scheduler_domain::{
        ContentSourceRef, LiveClass, SessionSlot, SessionStatus, ID,
    };
    use campus_scheduler_infra::{
        InMemoryAccessGrants, InMemoryNotificationSender, ISys,
    };
    use std::sync::Arc;

    const MINUTE: i64 = 1000 * 60;
    const HOUR: i64 = 60 * MINUTE;

    /// Mon Mar 1 2021 00:00:00 UTC
    const MAR_1_2021: i64 = 1614556800000;

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
        grants: Arc<InMemoryAccessGrants>,
        notifier: Arc<InMemoryNotificationSender>,
    }

    fn setup() -> TestContext {
        let mut ctx = CampusContext::create_inmemory();
        let grants = Arc::new(InMemoryAccessGrants::new());
        let notifier = Arc::new(InMemoryNotificationSender::new());
        ctx.ports.access_grants = grants.clone();
        ctx.ports.notification_sender = notifier.clone();
        ctx.config.reminders.lookahead_horizon_millis = 25 * HOUR;
        ctx.config.reminders.tolerance_millis = 5 * MINUTE;
        TestContext {
            ctx,
            grants,
            notifier,
        }
    }

    fn at(test_ctx: &mut TestContext, millis: i64) {
        test_ctx.ctx.sys = Arc::new(StaticTimeSys { millis });
    }

    async fn insert_session_starting_at(test_ctx: &TestContext, scheduled_at: i64) -> ClassSession {
        let class = LiveClass::new(ContentSourceRef::Course(Default::default()));
        test_ctx.ctx.repos.live_classes.insert(&class).await.unwrap();
        insert_session_for_class(test_ctx, &class, scheduled_at).await
    }

    async fn insert_session_for_class(
        test_ctx: &TestContext,
        class: &LiveClass,
        scheduled_at: i64,
    ) -> ClassSession {
        let session = ClassSession {
            id: Default::default(),
            live_class_id: class.id.clone(),
            content_item_id: Default::default(),
            slot: SessionSlot::Morning,
            scheduled_at,
            status: SessionStatus::Scheduled,
            is_free: false,
            capacity: None,
            remaining: None,
        };
        test_ctx
            .ctx
            .repos
            .class_sessions
            .insert_many(&[session.clone()])
            .await
            .unwrap();
        session
    }

    async fn scan(test_ctx: &TestContext) -> ScanReport {
        execute(ScanRemindersUseCase, &test_ctx.ctx).await.unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn sends_each_due_reminder_exactly_once_per_recipient() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &recipient);

        // Two scans land inside the same 1 hour window
        at(&mut test_ctx, session_start - 61 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);

        at(&mut test_ctx, session_start - 59 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 0);

        let sent = test_ctx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, ReminderKind::OneHourBefore);
        assert_eq!(sent[0].recipient_id, recipient);

        let records = test_ctx
            .ctx
            .repos
            .reminder_records
            .find_by_session(&session.id)
            .await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ReminderKind::OneHourBefore);
        assert_eq!(records[0].recipient_id, recipient);
    }

    #[actix_web::main]
    #[test]
    async fn a_missed_window_is_never_caught_up() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &recipient);

        // No scan runs inside the 1 hour window. The next scans land
        // before and after it.
        at(&mut test_ctx, session_start - 70 * MINUTE);
        scan(&test_ctx).await;
        at(&mut test_ctx, session_start - 50 * MINUTE);
        scan(&test_ctx).await;

        let records = test_ctx
            .ctx
            .repos
            .reminder_records
            .find_by_session(&session.id)
            .await;
        assert!(records
            .iter()
            .all(|r| r.kind != ReminderKind::OneHourBefore));
        assert!(test_ctx
            .notifier
            .sent()
            .iter()
            .all(|s| s.kind != ReminderKind::OneHourBefore));
    }

    #[actix_web::main]
    #[test]
    async fn unions_session_and_class_grants_without_duplicates() {
        let mut test_ctx = setup();
        let class = LiveClass::new(ContentSourceRef::Course(Default::default()));
        test_ctx.ctx.repos.live_classes.insert(&class).await.unwrap();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_for_class(&test_ctx, &class, session_start).await;

        let session_recipient = ID::default();
        let class_recipient = ID::default();
        let both_recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &session_recipient);
        test_ctx.grants.grant_class(&class.id, &class_recipient);
        test_ctx.grants.grant_session(&session.id, &both_recipient);
        test_ctx.grants.grant_class(&class.id, &both_recipient);

        at(&mut test_ctx, session_start - 60 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 3);

        let mut reminded = test_ctx
            .notifier
            .sent()
            .into_iter()
            .map(|s| s.recipient_id.as_string())
            .collect::<Vec<_>>();
        reminded.sort();
        let mut expected = vec![
            session_recipient.as_string(),
            class_recipient.as_string(),
            both_recipient.as_string(),
        ];
        expected.sort();
        assert_eq!(reminded, expected);
    }

    #[actix_web::main]
    #[test]
    async fn one_failing_recipient_does_not_block_the_others() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let failing = ID::default();
        let healthy = ID::default();
        test_ctx.grants.grant_session(&session.id, &failing);
        test_ctx.grants.grant_session(&session.id, &healthy);
        test_ctx.notifier.fail_for(&failing);

        at(&mut test_ctx, session_start - 61 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);
        assert_eq!(report.send_failures, 1);

        let sent = test_ctx.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id, healthy);

        // No record was written for the failed recipient, a later scan
        // inside the window retries the send
        test_ctx.notifier.recover(&failing);
        at(&mut test_ctx, session_start - 58 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);
        assert_eq!(report.send_failures, 0);

        let records = test_ctx
            .ctx
            .repos
            .reminder_records
            .find_by_session(&session.id)
            .await;
        assert_eq!(records.len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn sessions_of_inactive_classes_are_never_reminded() {
        let mut test_ctx = setup();
        let mut class = LiveClass::new(ContentSourceRef::Course(Default::default()));
        class.is_active = false;
        test_ctx.ctx.repos.live_classes.insert(&class).await.unwrap();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_for_class(&test_ctx, &class, session_start).await;
        let recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &recipient);

        at(&mut test_ctx, session_start - 60 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.sessions_inspected, 0);
        assert_eq!(report.reminders_sent, 0);
        assert!(test_ctx.notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn only_kinds_inside_their_window_are_due() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 36 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &recipient);

        // 24 hours ahead only the day_before kind is due
        at(&mut test_ctx, session_start - 24 * HOUR);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);
        let sent = test_ctx.notifier.sent();
        assert_eq!(sent[0].kind, ReminderKind::DayBefore);

        // At the session start the starting_now kind is due
        at(&mut test_ctx, session_start);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);
        let sent = test_ctx.notifier.sent();
        assert_eq!(sent.last().unwrap().kind, ReminderKind::StartingNow);
    }

    #[actix_web::main]
    #[test]
    async fn ignores_sessions_outside_the_lookahead_horizon() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 48 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &recipient);

        // 48 hours out is beyond the 25 hour horizon
        at(&mut test_ctx, MAR_1_2021);
        let report = scan(&test_ctx).await;
        assert_eq!(report.sessions_inspected, 0);
        assert!(test_ctx.notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn later_grants_are_reminded_even_after_earlier_sends() {
        let mut test_ctx = setup();
        let session_start = MAR_1_2021 + 12 * HOUR;
        let session = insert_session_starting_at(&test_ctx, session_start).await;
        let early_recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &early_recipient);

        at(&mut test_ctx, session_start - 62 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);

        // A second recipient is granted access after the first send
        let late_recipient = ID::default();
        test_ctx.grants.grant_session(&session.id, &late_recipient);

        at(&mut test_ctx, session_start - 58 * MINUTE);
        let report = scan(&test_ctx).await;
        assert_eq!(report.reminders_sent, 1);

        let records = test_ctx
            .ctx
            .repos
            .reminder_records
            .find_by_session(&session.id)
            .await;
        assert_eq!(records.len(), 2);
    }
}
