mod access_policy;
mod catalog;
mod class_session;
mod live_class;
mod reminder;
mod shared;

pub use access_policy::AccessPolicy;
pub use catalog::{cycle_length, ContentItem};
pub use class_session::{ClassSession, SessionSlot, SessionStatus};
pub use live_class::{ContentSourceRef, LiveClass};
pub use reminder::{ReminderKind, ReminderRecord};
pub use shared::entity::{Entity, ID};
