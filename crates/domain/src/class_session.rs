use crate::shared::entity::{Entity, ID};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// One of the fixed daily scheduling positions. Every calendar day of an
/// active class carries exactly one session per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSlot {
    Morning,
    Afternoon,
    Evening,
}

impl SessionSlot {
    pub fn all() -> [SessionSlot; 3] {
        [
            SessionSlot::Morning,
            SessionSlot::Afternoon,
            SessionSlot::Evening,
        ]
    }

    /// UTC wall-clock time at which sessions in this slot start
    pub fn start_time(&self) -> NaiveTime {
        match self {
            SessionSlot::Morning => NaiveTime::from_hms(9, 0, 0),
            SessionSlot::Afternoon => NaiveTime::from_hms(14, 0, 0),
            SessionSlot::Evening => NaiveTime::from_hms(19, 0, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSlot::Morning => "morning",
            SessionSlot::Afternoon => "afternoon",
            SessionSlot::Evening => "evening",
        }
    }
}

impl Display for SessionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidSessionSlotError {
    #[error("Invalid session slot: {0}")]
    Unknown(String),
}

impl FromStr for SessionSlot {
    type Err = InvalidSessionSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(SessionSlot::Morning),
            "afternoon" => Ok(SessionSlot::Afternoon),
            "evening" => Ok(SessionSlot::Evening),
            _ => Err(InvalidSessionSlotError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Status moves scheduled -> in_progress -> completed. Cancellation is
    /// possible until the session has completed.
    pub fn can_transition_to(&self, next: &SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Scheduled, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Completed)
                | (SessionStatus::Scheduled, SessionStatus::Cancelled)
                | (SessionStatus::InProgress, SessionStatus::Cancelled)
        )
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidSessionStatusError {
    #[error("Invalid session status: {0}")]
    Unknown(String),
}

impl FromStr for SessionStatus {
    type Err = InvalidSessionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            _ => Err(InvalidSessionStatusError::Unknown(s.to_string())),
        }
    }
}

/// A single scheduled occurrence of a `LiveClass`, built from one catalog
/// item at one (day, slot) position.
#[derive(Debug, Clone)]
pub struct ClassSession {
    pub id: ID,
    pub live_class_id: ID,
    pub content_item_id: ID,
    pub slot: SessionSlot,
    /// Derived from the calendar day and the slot's wall-clock time, in
    /// millis since the epoch
    pub scheduled_at: i64,
    pub status: SessionStatus,
    /// Fixed at creation by the access policy
    pub is_free: bool,
    pub capacity: Option<i64>,
    pub remaining: Option<i64>,
}

impl Entity for ClassSession {
    fn id(&self) -> &ID {
        &self.id
    }
}
