//! Notification delivery seam.
//!
//! The core computes what should fire and when; an app shell supplies a
//! [`Notifier`] that talks to the platform notification center. The one
//! flow the core owns is [`reschedule`]: wipe everything previously
//! scheduled, then install the currently pending milestones, so the
//! delivery backend always mirrors the latest record and preferences.

use chrono::{DateTime, Utc};
use log::debug;

use crate::milestones::{compute_milestones, MilestoneRequest};
use crate::record::{NotificationPreferences, SobrietyRecord};

/// Whether the platform allows this app to post notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Platform notification backend.
pub trait Notifier {
    /// Current permission state. Backends that prompt the user should do
    /// so before reporting.
    fn permission(&mut self) -> Result<Permission, Box<dyn std::error::Error>>;

    /// Schedule one future notification.
    fn schedule(&mut self, request: &MilestoneRequest) -> Result<(), Box<dyn std::error::Error>>;

    /// Remove everything previously scheduled by this app.
    fn cancel_all(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Replace the backend's pending notifications with the current milestone
/// schedule.
///
/// Cancellation always runs first, even when notifications are disabled
/// or permission is denied, so stale entries from an earlier state never
/// survive. Returns how many milestones were installed; disabled
/// preferences and denied permission both install zero and are not
/// errors.
pub fn reschedule(
    notifier: &mut dyn Notifier,
    record: &SobrietyRecord,
    preferences: &NotificationPreferences,
    now: DateTime<Utc>,
) -> Result<usize, Box<dyn std::error::Error>> {
    notifier.cancel_all()?;

    if !preferences.enabled {
        debug!("notifications disabled, schedule cleared");
        return Ok(0);
    }
    if notifier.permission()? == Permission::Denied {
        debug!("notification permission denied, schedule cleared");
        return Ok(0);
    }

    let milestones = compute_milestones(record.started_at, now);
    for milestone in &milestones {
        notifier.schedule(milestone)?;
    }
    debug!("installed {} milestone notifications", milestones.len());
    Ok(milestones.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        CancelAll,
        Schedule(String),
    }

    struct RecordingNotifier {
        permission: Permission,
        ops: Vec<Op>,
    }

    impl RecordingNotifier {
        fn new(permission: Permission) -> Self {
            Self {
                permission,
                ops: Vec::new(),
            }
        }

        fn scheduled_keys(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Schedule(key) => Some(key.as_str()),
                    Op::CancelAll => None,
                })
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&mut self) -> Result<Permission, Box<dyn std::error::Error>> {
            Ok(self.permission)
        }

        fn schedule(
            &mut self,
            request: &MilestoneRequest,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.ops.push(Op::Schedule(request.idempotency_key.clone()));
            Ok(())
        }

        fn cancel_all(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.ops.push(Op::CancelAll);
            Ok(())
        }
    }

    fn enabled_preferences() -> NotificationPreferences {
        NotificationPreferences {
            enabled: true,
            ..NotificationPreferences::default()
        }
    }

    #[test]
    fn cancel_runs_before_any_scheduling() {
        let now = fixed_time("2024-06-01T12:00:00Z");
        let record = SobrietyRecord::new(now);
        let mut notifier = RecordingNotifier::new(Permission::Granted);

        let installed =
            reschedule(&mut notifier, &record, &enabled_preferences(), now).expect("reschedule");

        assert_eq!(notifier.ops[0], Op::CancelAll);
        assert_eq!(notifier.ops.len(), installed + 1);
    }

    #[test]
    fn installed_set_matches_the_computed_schedule() {
        let now = fixed_time("2024-06-08T12:00:00Z");
        let mut record = SobrietyRecord::new(now);
        record
            .set_start(now - Duration::days(7), now)
            .expect("past start");
        let mut notifier = RecordingNotifier::new(Permission::Granted);

        reschedule(&mut notifier, &record, &enabled_preferences(), now).expect("reschedule");

        let expected: Vec<String> = compute_milestones(record.started_at, now)
            .into_iter()
            .map(|m| m.idempotency_key)
            .collect();
        assert_eq!(notifier.scheduled_keys(), expected);
    }

    #[test]
    fn disabled_preferences_still_cancel() {
        let now = fixed_time("2024-06-01T12:00:00Z");
        let record = SobrietyRecord::new(now);
        let mut notifier = RecordingNotifier::new(Permission::Granted);

        let installed = reschedule(
            &mut notifier,
            &record,
            &NotificationPreferences::default(),
            now,
        )
        .expect("reschedule");

        assert_eq!(installed, 0);
        assert_eq!(notifier.ops, vec![Op::CancelAll]);
    }

    #[test]
    fn denied_permission_is_a_silent_no_op() {
        let now = fixed_time("2024-06-01T12:00:00Z");
        let record = SobrietyRecord::new(now);
        let mut notifier = RecordingNotifier::new(Permission::Denied);

        let installed =
            reschedule(&mut notifier, &record, &enabled_preferences(), now).expect("reschedule");

        assert_eq!(installed, 0);
        assert_eq!(notifier.ops, vec![Op::CancelAll]);
    }

    #[test]
    fn second_reschedule_supersedes_the_first() {
        let now = fixed_time("2024-06-01T12:00:00Z");
        let mut record = SobrietyRecord::new(now);
        let mut notifier = RecordingNotifier::new(Permission::Granted);

        reschedule(&mut notifier, &record, &enabled_preferences(), now).expect("first");
        let first_len = notifier.ops.len();

        let later = now + Duration::days(6);
        record
            .set_start(now - Duration::days(1), later)
            .expect("past start");
        reschedule(&mut notifier, &record, &enabled_preferences(), later).expect("second");

        assert_eq!(notifier.ops[first_len], Op::CancelAll);
        let keys_after: Vec<&str> = notifier.ops[first_len + 1..]
            .iter()
            .filter_map(|op| match op {
                Op::Schedule(key) => Some(key.as_str()),
                Op::CancelAll => None,
            })
            .collect();
        // day-5 passed between the two calls.
        assert!(!keys_after.contains(&"day-5"));
        assert!(keys_after.contains(&"day-10"));
    }
}
