use campus_scheduler_domain::{ClassSession, SessionSlot, SessionStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClassSessionDTO {
    pub id: ID,
    pub live_class_id: ID,
    pub content_item_id: ID,
    pub slot: SessionSlot,
    pub scheduled_at: i64,
    pub status: SessionStatus,
    pub is_free: bool,
    pub capacity: Option<i64>,
    pub remaining: Option<i64>,
}

impl ClassSessionDTO {
    pub fn new(session: ClassSession) -> Self {
        Self {
            id: session.id,
            live_class_id: session.live_class_id,
            content_item_id: session.content_item_id,
            slot: session.slot,
            scheduled_at: session.scheduled_at,
            status: session.status,
            is_free: session.is_free,
            capacity: session.capacity,
            remaining: session.remaining,
        }
    }
}
