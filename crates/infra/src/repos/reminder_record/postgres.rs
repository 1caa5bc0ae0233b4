use super::IReminderRecordRepo;
use campus_scheduler_domain::{ReminderKind, ReminderRecord, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderRecordRepo {
    pool: PgPool,
}

impl PostgresReminderRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRecordRaw {
    class_session_uid: Uuid,
    kind: String,
    recipient_uid: Uuid,
    sent_at: i64,
}

impl From<ReminderRecordRaw> for ReminderRecord {
    fn from(e: ReminderRecordRaw) -> Self {
        Self {
            class_session_id: e.class_session_uid.into(),
            kind: e.kind.parse().unwrap(),
            recipient_id: e.recipient_uid.into(),
            sent_at: e.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRecordRepo for PostgresReminderRecordRepo {
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO reminder_records
            (class_session_uid, kind, recipient_uid, sent_at)
            VALUES($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(*record.class_session_id.inner_ref())
        .bind(record.kind.as_str())
        .bind(*record.recipient_id.inner_ref())
        .bind(record.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn find(
        &self,
        class_session_id: &ID,
        kind: ReminderKind,
        recipient_id: &ID,
    ) -> Option<ReminderRecord> {
        let record: ReminderRecordRaw = match sqlx::query_as(
            r#"
            SELECT * FROM reminder_records
            WHERE class_session_uid = $1 AND kind = $2 AND recipient_uid = $3
            "#,
        )
        .bind(*class_session_id.inner_ref())
        .bind(kind.as_str())
        .bind(*recipient_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(record) => record,
            Err(_) => return None,
        };
        Some(record.into())
    }

    async fn find_by_session(&self, class_session_id: &ID) -> Vec<ReminderRecord> {
        let records: Vec<ReminderRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_records
            WHERE class_session_uid = $1
            "#,
        )
        .bind(*class_session_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        records.into_iter().map(|r| r.into()).collect()
    }
}
