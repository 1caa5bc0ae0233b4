use super::IReminderRecordRepo;
use campus_scheduler_domain::{ReminderKind, ReminderRecord, ID};

pub struct InMemoryReminderRecordRepo {
    records: std::sync::Mutex<Vec<ReminderRecord>>,
}

impl InMemoryReminderRecordRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRecordRepo for InMemoryReminderRecordRepo {
    async fn insert(&self, record: &ReminderRecord) -> anyhow::Result<bool> {
        let mut records = self.records.lock().unwrap();
        let exists = records.iter().any(|r| {
            r.class_session_id == record.class_session_id
                && r.kind == record.kind
                && r.recipient_id == record.recipient_id
        });
        if exists {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn find(
        &self,
        class_session_id: &ID,
        kind: ReminderKind,
        recipient_id: &ID,
    ) -> Option<ReminderRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .find(|r| {
                r.class_session_id == *class_session_id
                    && r.kind == kind
                    && r.recipient_id == *recipient_id
            })
            .cloned()
    }

    async fn find_by_session(&self, class_session_id: &ID) -> Vec<ReminderRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| r.class_session_id == *class_session_id)
            .cloned()
            .collect()
    }
}
