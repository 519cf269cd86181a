//! Milestone scheduling.
//!
//! From a sobriety start date, derives the full set of future milestone
//! notifications: day milestones for the first month (every 5 days up to
//! day 30), then calendar-month milestones. Only strictly future
//! milestones are produced, so re-running the computation after a reset
//! or settings change yields exactly the set that still needs delivering.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Day milestones within the first month of sobriety.
pub const DAY_OFFSETS: [i64; 6] = [5, 10, 15, 20, 25, 30];

/// How many monthly milestones to look ahead. A century of months keeps
/// the set finite while exceeding any plausible lifetime of the record.
pub const MONTH_HORIZON: u32 = 1200;

/// Notification title shared by every milestone.
pub const MILESTONE_NOTIFICATION_TITLE: &str = "Milestone Achieved";

/// One scheduled milestone notification.
///
/// `idempotency_key` is stable across recomputations for the same
/// milestone, so a delivery backend can dedupe or replace instead of
/// double-scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneRequest {
    pub fire_at: DateTime<Utc>,
    pub message: String,
    pub idempotency_key: String,
}

/// Compute every milestone still ahead of `now` for a record started at
/// `start`.
///
/// Day milestones come first in ascending offset, then month milestones
/// in ascending offset. Milestones at or before `now` are skipped,
/// including any monthly offset whose clamped date has already passed;
/// later offsets are still examined, so one past offset never cuts the
/// schedule short.
pub fn compute_milestones(start: DateTime<Utc>, now: DateTime<Utc>) -> Vec<MilestoneRequest> {
    let mut out = Vec::new();

    for days in DAY_OFFSETS {
        let fire_at = start + Duration::days(days);
        if fire_at > now {
            out.push(MilestoneRequest {
                fire_at,
                message: format!("Congratulations on {days} days of sobriety!"),
                idempotency_key: format!("day-{days}"),
            });
        }
    }

    for month in 1..=MONTH_HORIZON {
        // Month addition clamps to the end of shorter months, matching
        // the duration breakdown's month arithmetic.
        let Some(fire_at) = start.checked_add_months(Months::new(month)) else {
            break;
        };
        if fire_at <= now {
            continue;
        }
        out.push(MilestoneRequest {
            fire_at,
            message: format!("Congratulations on {month} month(s) of sobriety!"),
            idempotency_key: format!("month-{month}"),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    #[test]
    fn fresh_start_gets_the_full_schedule() {
        let now = fixed_time("2024-06-01T12:00:00Z");
        let milestones = compute_milestones(now, now);

        assert_eq!(milestones.len(), DAY_OFFSETS.len() + MONTH_HORIZON as usize);
        assert_eq!(milestones[0].fire_at, now + Duration::days(5));
        assert_eq!(milestones[0].message, "Congratulations on 5 days of sobriety!");
        assert_eq!(milestones[0].idempotency_key, "day-5");
    }

    #[test]
    fn elapsed_day_milestones_are_dropped() {
        let now = fixed_time("2024-06-08T12:00:00Z");
        let start = now - Duration::days(7);
        let milestones = compute_milestones(start, now);

        assert!(milestones.iter().all(|m| m.idempotency_key != "day-5"));
        let day10 = milestones
            .iter()
            .find(|m| m.idempotency_key == "day-10")
            .expect("day-10 still pending");
        assert_eq!(day10.fire_at, now + Duration::days(3));
    }

    #[test]
    fn elapsed_months_are_skipped_without_ending_the_scan() {
        let start = fixed_time("2024-01-15T09:00:00Z");
        let now = fixed_time("2024-04-20T09:00:00Z");
        let milestones = compute_milestones(start, now);

        // Months 1 through 3 have passed; day milestones are all gone too.
        assert!(milestones.iter().all(|m| !m.idempotency_key.starts_with("day-")));
        assert!(milestones.iter().all(|m| m.idempotency_key != "month-3"));
        assert_eq!(milestones[0].idempotency_key, "month-4");
        assert_eq!(milestones[0].fire_at, fixed_time("2024-05-15T09:00:00Z"));
        assert_eq!(milestones.len(), (MONTH_HORIZON - 3) as usize);
    }

    #[test]
    fn month_end_start_clamps_to_february() {
        let start = fixed_time("2023-01-31T10:00:00Z");
        let milestones = compute_milestones(start, start);

        let first_month = milestones
            .iter()
            .find(|m| m.idempotency_key == "month-1")
            .expect("month-1 present");
        assert_eq!(first_month.fire_at, fixed_time("2023-02-28T10:00:00Z"));

        let thirteenth = milestones
            .iter()
            .find(|m| m.idempotency_key == "month-13")
            .expect("month-13 present");
        assert_eq!(thirteenth.fire_at, fixed_time("2024-02-29T10:00:00Z"));
    }

    #[test]
    fn milestone_exactly_at_now_is_not_pending() {
        let start = fixed_time("2024-06-01T12:00:00Z");
        let now = start + Duration::days(5);
        let milestones = compute_milestones(start, now);

        assert!(milestones.iter().all(|m| m.idempotency_key != "day-5"));
        assert_eq!(milestones[0].idempotency_key, "day-10");
    }

    #[test]
    fn month_messages_keep_the_fixed_wording() {
        let start = fixed_time("2024-06-01T12:00:00Z");
        let milestones = compute_milestones(start, start);

        let month1 = milestones
            .iter()
            .find(|m| m.idempotency_key == "month-1")
            .expect("month-1 present");
        assert_eq!(month1.message, "Congratulations on 1 month(s) of sobriety!");
        let month12 = milestones
            .iter()
            .find(|m| m.idempotency_key == "month-12")
            .expect("month-12 present");
        assert_eq!(month12.message, "Congratulations on 12 month(s) of sobriety!");
    }

    #[test]
    fn schedule_lists_days_then_months() {
        let start = fixed_time("2024-05-28T00:00:00Z");
        let now = fixed_time("2024-06-10T00:00:00Z");
        let milestones = compute_milestones(start, now);

        let keys: Vec<&str> = milestones
            .iter()
            .map(|m| m.idempotency_key.as_str())
            .collect();
        assert_eq!(&keys[..5], &["day-15", "day-20", "day-25", "day-30", "month-1"]);
        assert!(milestones.iter().all(|m| m.fire_at > now));

        // Day offsets ascend, then month offsets ascend.
        let first_month = keys.iter().position(|k| k.starts_with("month-")).unwrap();
        assert!(keys[..first_month].iter().all(|k| k.starts_with("day-")));
        assert!(keys[first_month..].iter().all(|k| k.starts_with("month-")));
    }

    proptest! {
        #[test]
        fn recomputation_is_idempotent(start_secs in 0i64..4_102_444_800, elapsed in 0i64..400_000_000) {
            let start = DateTime::from_timestamp(start_secs, 0).expect("valid timestamp");
            let now = start + Duration::seconds(elapsed);

            let first = compute_milestones(start, now);
            let second = compute_milestones(start, now);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn keys_are_unique_and_dates_future(start_secs in 0i64..4_102_444_800, elapsed in 0i64..400_000_000) {
            let start = DateTime::from_timestamp(start_secs, 0).expect("valid timestamp");
            let now = start + Duration::seconds(elapsed);
            let milestones = compute_milestones(start, now);

            let mut keys: Vec<&str> = milestones.iter().map(|m| m.idempotency_key.as_str()).collect();
            keys.sort_unstable();
            keys.dedup();
            prop_assert_eq!(keys.len(), milestones.len());
            prop_assert!(milestones.iter().all(|m| m.fire_at > now));
        }
    }
}
