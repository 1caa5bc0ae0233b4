use super::IClassSessionRepo;
use crate::repos::shared::inmemory_repo::*;
use campus_scheduler_domain::{ClassSession, SessionStatus, ID};

pub struct InMemoryClassSessionRepo {
    sessions: std::sync::Mutex<Vec<ClassSession>>,
}

impl InMemoryClassSessionRepo {
    pub fn new() -> Self {
        Self {
            sessions: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IClassSessionRepo for InMemoryClassSessionRepo {
    async fn insert_many(&self, sessions: &[ClassSession]) -> anyhow::Result<()> {
        for session in sessions {
            // Mirrors the unique constraint on (class, datetime, slot)
            let duplicates = find_by(&self.sessions, |s: &ClassSession| {
                s.live_class_id == session.live_class_id
                    && s.scheduled_at == session.scheduled_at
                    && s.slot == session.slot
            });
            if duplicates.is_empty() {
                insert(session, &self.sessions);
            }
        }
        Ok(())
    }

    async fn save(&self, session: &ClassSession) -> anyhow::Result<()> {
        save(session, &self.sessions);
        Ok(())
    }

    async fn find(&self, session_id: &ID) -> Option<ClassSession> {
        find(session_id, &self.sessions)
    }

    async fn find_future_by_class(&self, live_class_id: &ID, from: i64) -> Vec<ClassSession> {
        let mut sessions = find_by(&self.sessions, |s: &ClassSession| {
            s.live_class_id == *live_class_id
                && s.status == SessionStatus::Scheduled
                && s.scheduled_at >= from
        });
        sessions.sort_by_key(|s| s.scheduled_at);
        sessions
    }

    async fn find_scheduled_in_range(&self, start: i64, end: i64) -> Vec<ClassSession> {
        let mut sessions = find_by(&self.sessions, |s: &ClassSession| {
            s.status == SessionStatus::Scheduled && s.scheduled_at >= start && s.scheduled_at < end
        });
        sessions.sort_by_key(|s| s.scheduled_at);
        sessions
    }
}
