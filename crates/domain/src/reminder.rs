use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A named offset before session start at which recipients should be
/// notified. The scanner runs periodically rather than continuously, so
/// each kind is matched inside a tolerance window around its offset
/// instead of at the exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    DayBefore,
    TwoHoursBefore,
    OneHourBefore,
    HalfHourBefore,
    StartingSoon,
    StartingNow,
}

impl ReminderKind {
    pub fn all() -> [ReminderKind; 6] {
        [
            ReminderKind::DayBefore,
            ReminderKind::TwoHoursBefore,
            ReminderKind::OneHourBefore,
            ReminderKind::HalfHourBefore,
            ReminderKind::StartingSoon,
            ReminderKind::StartingNow,
        ]
    }

    /// Target offset before session start, in millis
    pub fn offset_millis(&self) -> i64 {
        match self {
            ReminderKind::DayBefore => 1000 * 60 * 60 * 24,
            ReminderKind::TwoHoursBefore => 1000 * 60 * 60 * 2,
            ReminderKind::OneHourBefore => 1000 * 60 * 60,
            ReminderKind::HalfHourBefore => 1000 * 60 * 30,
            ReminderKind::StartingSoon => 1000 * 60 * 2,
            ReminderKind::StartingNow => 0,
        }
    }

    /// Whether this kind is due for a session that starts in
    /// `time_until_session` millis. The window must be wider than the scan
    /// interval or reminders can be silently missed.
    pub fn is_due(&self, time_until_session: i64, tolerance_millis: i64) -> bool {
        let offset = self.offset_millis();
        time_until_session >= offset - tolerance_millis
            && time_until_session <= offset + tolerance_millis
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::DayBefore => "day_before",
            ReminderKind::TwoHoursBefore => "two_hours_before",
            ReminderKind::OneHourBefore => "one_hour_before",
            ReminderKind::HalfHourBefore => "half_hour_before",
            ReminderKind::StartingSoon => "starting_soon",
            ReminderKind::StartingNow => "starting_now",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidReminderKindError {
    #[error("Invalid reminder kind: {0}")]
    Unknown(String),
}

impl FromStr for ReminderKind {
    type Err = InvalidReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReminderKind::all()
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidReminderKindError::Unknown(s.to_string()))
    }
}

/// Proof that a reminder of `kind` was delivered to `recipient_id` for a
/// `ClassSession`. At most one record exists per (session, kind,
/// recipient), which is what makes resending to the same recipient
/// impossible while still allowing later grants to be reminded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRecord {
    pub class_session_id: ID,
    pub kind: ReminderKind,
    pub recipient_id: ID,
    pub sent_at: i64,
}
