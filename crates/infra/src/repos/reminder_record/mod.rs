mod inmemory;
mod postgres;

use campus_scheduler_domain::{ReminderKind, ReminderRecord, ID};
pub use inmemory::InMemoryReminderRecordRepo;
pub use postgres::PostgresReminderRecordRepo;

#[async_trait::async_trait]
pub trait IReminderRecordRepo: Send + Sync {
    /// Returns false when a record for the same (session, kind, recipient)
    /// already exists. An overlapping scan that lost the race gets the
    /// same answer as one that checked up front.
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<bool>;
    async fn find(
        &self,
        class_session_id: &ID,
        kind: ReminderKind,
        recipient_id: &ID,
    ) -> Option<ReminderRecord>;
    async fn find_by_session(&self, class_session_id: &ID) -> Vec<ReminderRecord>;
}
