//! The sobriety record and its validation rules.
//!
//! A [`SobrietyRecord`] is the single piece of user state: when sobriety
//! started and what to call the user. The one invariant worth centralizing
//! is that the start date can never sit in the future; [`clamp_start`] is
//! the whole rule, and every mutation path goes through it.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The user's sobriety state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SobrietyRecord {
    /// The instant sobriety began. Never in the future.
    pub started_at: DateTime<Utc>,
    /// Display name the UI greets the user with. May be empty.
    pub display_name: String,
}

impl SobrietyRecord {
    /// First-use record: sobriety starts now, no name yet.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            display_name: String::new(),
        }
    }

    /// Apply a candidate start date.
    ///
    /// A future candidate is clamped to `now` and reported as
    /// [`ValidationError::StartInFuture`]; the record is valid after the
    /// call either way, so the `Err` is the flag the UI shows, not a
    /// failure to recover from.
    pub fn set_start(
        &mut self,
        candidate: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let (accepted, rejected) = clamp_start(candidate, now);
        self.started_at = accepted;
        if rejected {
            Err(ValidationError::StartInFuture { candidate, now })
        } else {
            Ok(())
        }
    }
}

/// Resolve a candidate start instant against `now`.
///
/// Returns the accepted instant and whether the candidate was rejected:
/// a candidate after `now` yields `(now, true)`, anything else passes
/// through unchanged as `(candidate, false)`.
pub fn clamp_start(candidate: DateTime<Utc>, now: DateTime<Utc>) -> (DateTime<Utc>, bool) {
    if candidate > now {
        (now, true)
    } else {
        (candidate, false)
    }
}

/// Milestone-notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// Master switch. Off by default until the user opts in.
    pub enabled: bool,
    /// Preferred reminder time of day; only hour and minute are significant.
    pub reminder_time: NaiveTime,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            reminder_time: NaiveTime::MIN,
        }
    }
}
