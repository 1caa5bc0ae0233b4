use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Where a `LiveClass` pulls its content rotation from. Either a full
/// course or a standalone playlist in the content catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ContentSourceRef {
    Course(ID),
    Playlist(ID),
}

/// A live class replays a finite content catalog indefinitely. The
/// `cycle_cursor` is the index of the next catalog position to schedule
/// and is the only state needed to resume the rotation across generator
/// runs.
#[derive(Debug, Clone)]
pub struct LiveClass {
    pub id: ID,
    pub content_source: ContentSourceRef,
    /// Always in `[0, cycle_length)`
    pub cycle_cursor: usize,
    /// Inactive classes are never extended or reminded
    pub is_active: bool,
}

impl LiveClass {
    pub fn new(content_source: ContentSourceRef) -> Self {
        Self {
            id: Default::default(),
            content_source,
            cycle_cursor: 0,
            is_active: true,
        }
    }

    /// Moves the cursor forward after `days` days of sessions have been
    /// scheduled.
    pub fn advance_cursor(&mut self, days: usize, cycle_length: usize) {
        if cycle_length == 0 {
            return;
        }
        self.cycle_cursor = (self.cycle_cursor + days) % cycle_length;
    }
}

impl Entity for LiveClass {
    fn id(&self) -> &ID {
        &self.id
    }
}
