use campus_scheduler_domain::{ContentSourceRef, LiveClass, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LiveClassDTO {
    pub id: ID,
    pub content_source: ContentSourceRef,
    pub cycle_cursor: usize,
    pub is_active: bool,
}

impl LiveClassDTO {
    pub fn new(live_class: LiveClass) -> Self {
        Self {
            id: live_class.id,
            content_source: live_class.content_source,
            cycle_cursor: live_class.cycle_cursor,
            is_active: live_class.is_active,
        }
    }
}
