mod inmemory;
mod postgres;

use campus_scheduler_domain::{ClassSession, ID};
pub use inmemory::InMemoryClassSessionRepo;
pub use postgres::PostgresClassSessionRepo;

#[async_trait::async_trait]
pub trait IClassSessionRepo: Send + Sync {
    /// Inserts a batch of generated sessions. Sessions colliding with an
    /// already persisted (class, datetime, slot) key are skipped, so a
    /// racing duplicate insert cannot corrupt the calendar.
    async fn insert_many(&self, sessions: &[ClassSession]) -> anyhow::Result<()>;
    async fn save(&self, session: &ClassSession) -> anyhow::Result<()>;
    async fn find(&self, session_id: &ID) -> Option<ClassSession>;
    /// Sessions of a class with status scheduled and `scheduled_at >=
    /// from`, ordered by datetime
    async fn find_future_by_class(&self, live_class_id: &ID, from: i64) -> Vec<ClassSession>;
    /// Sessions with status scheduled and `scheduled_at` in `[start,
    /// end)`, ordered by datetime
    async fn find_scheduled_in_range(&self, start: i64, end: i64) -> Vec<ClassSession>;
}
