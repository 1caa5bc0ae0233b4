use super::IClassSessionRepo;
use campus_scheduler_domain::{ClassSession, SessionStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresClassSessionRepo {
    pool: PgPool,
}

impl PostgresClassSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClassSessionRaw {
    session_uid: Uuid,
    live_class_uid: Uuid,
    content_item_uid: Uuid,
    slot: String,
    scheduled_at: i64,
    status: String,
    is_free: bool,
    capacity: Option<i64>,
    remaining: Option<i64>,
}

impl From<ClassSessionRaw> for ClassSession {
    fn from(e: ClassSessionRaw) -> Self {
        Self {
            id: e.session_uid.into(),
            live_class_id: e.live_class_uid.into(),
            content_item_id: e.content_item_uid.into(),
            slot: e.slot.parse().unwrap(),
            scheduled_at: e.scheduled_at,
            status: e.status.parse().unwrap(),
            is_free: e.is_free,
            capacity: e.capacity,
            remaining: e.remaining,
        }
    }
}

#[async_trait::async_trait]
impl IClassSessionRepo for PostgresClassSessionRepo {
    async fn insert_many(&self, sessions: &[ClassSession]) -> anyhow::Result<()> {
        for session in sessions {
            sqlx::query(
                r#"
                INSERT INTO class_sessions
                (session_uid, live_class_uid, content_item_uid, slot, scheduled_at, status, is_free, capacity, remaining)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (live_class_uid, scheduled_at, slot) DO NOTHING
                "#,
            )
            .bind(*session.id.inner_ref())
            .bind(*session.live_class_id.inner_ref())
            .bind(*session.content_item_id.inner_ref())
            .bind(session.slot.as_str())
            .bind(session.scheduled_at)
            .bind(session.status.as_str())
            .bind(session.is_free)
            .bind(session.capacity)
            .bind(session.remaining)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn save(&self, session: &ClassSession) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE class_sessions
            SET status = $2,
            capacity = $3,
            remaining = $4
            WHERE session_uid = $1
            "#,
        )
        .bind(*session.id.inner_ref())
        .bind(session.status.as_str())
        .bind(session.capacity)
        .bind(session.remaining)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save class session: {:?}", e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, session_id: &ID) -> Option<ClassSession> {
        let session: ClassSessionRaw = match sqlx::query_as(
            r#"
            SELECT * FROM class_sessions
            WHERE session_uid = $1
            "#,
        )
        .bind(*session_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(session) => session,
            Err(_) => return None,
        };
        Some(session.into())
    }

    async fn find_future_by_class(&self, live_class_id: &ID, from: i64) -> Vec<ClassSession> {
        let sessions: Vec<ClassSessionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM class_sessions AS s
            WHERE s.live_class_uid = $1 AND s.status = $2 AND s.scheduled_at >= $3
            ORDER BY s.scheduled_at
            "#,
        )
        .bind(*live_class_id.inner_ref())
        .bind(SessionStatus::Scheduled.as_str())
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        sessions.into_iter().map(|s| s.into()).collect()
    }

    async fn find_scheduled_in_range(&self, start: i64, end: i64) -> Vec<ClassSession> {
        let sessions: Vec<ClassSessionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM class_sessions AS s
            WHERE s.status = $1 AND s.scheduled_at >= $2 AND s.scheduled_at < $3
            ORDER BY s.scheduled_at
            "#,
        )
        .bind(SessionStatus::Scheduled.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        sessions.into_iter().map(|s| s.into()).collect()
    }
}
