//! Calendar-aware elapsed-time formatting.
//!
//! Turns a start instant and a current instant into the "you have been
//! sober for ..." string. Months and years here are genuine calendar units
//! (a month is however long that month was), not 30-day approximations, so
//! the decomposition anchors on real calendar month addition rather than on
//! fixed divisors.

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

/// Calendar decomposition of the interval `[start, now)`.
///
/// Every field is the calendar-correct remainder after subtracting the
/// larger units. All fields are zero when `now <= start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationBreakdown {
    /// Decompose the interval between two instants.
    ///
    /// Pure and total: a reversed interval (`now < start`) yields all
    /// zeros rather than an error, since a future start date is already
    /// rejected upstream by the record invariant.
    ///
    /// The whole-month count is found first; month addition clamps to the
    /// last valid day of shorter months (Jan 31 + 1 month = Feb 28/29),
    /// the same rule the milestone scheduler uses, so the two can never
    /// disagree about where a month boundary falls.
    pub fn between(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now <= start {
            return Self::default();
        }

        let (months_total, anchor) = whole_months_between(start, now);
        let rest = now.signed_duration_since(anchor).num_seconds();

        Self {
            years: months_total / 12,
            months: months_total % 12,
            days: (rest / 86_400) as u32,
            hours: ((rest / 3_600) % 24) as u32,
            minutes: ((rest / 60) % 60) as u32,
            seconds: (rest % 60) as u32,
        }
    }
}

/// Largest `m` such that `start + m months <= now`, with the anchor that
/// addition lands on. Requires `start <= now`.
fn whole_months_between(start: DateTime<Utc>, now: DateTime<Utc>) -> (u32, DateTime<Utc>) {
    // The (year, month) delta overshoots by at most one month when now's
    // day-of-month/time has not yet caught up to start's.
    let estimate =
        ((now.year() - start.year()) * 12 + now.month() as i32 - start.month() as i32).max(0);

    let mut m = estimate as u32;
    loop {
        if let Some(anchor) = start.checked_add_months(Months::new(m)) {
            if anchor <= now {
                return (m, anchor);
            }
        }
        if m == 0 {
            return (0, start);
        }
        m -= 1;
    }
}

/// Which units a rendered duration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Years, months, days. Smallest emitted unit is days.
    Short,
    /// Years down to seconds, for the once-a-second live display.
    Live,
}

/// Render the elapsed time between two instants.
///
/// Units with value zero are skipped except the smallest unit of the
/// mode, which is always present, so an empty interval reads "0 seconds"
/// ("0 days" in short mode) instead of an empty string. Components join
/// with ", " and pluralize with a trailing "s" whenever the value is not
/// exactly 1.
pub fn format_duration(start: DateTime<Utc>, now: DateTime<Utc>, mode: DisplayMode) -> String {
    let b = DurationBreakdown::between(start, now);
    let mut parts: Vec<String> = Vec::new();

    push_unit(&mut parts, b.years, "year", false);
    push_unit(&mut parts, b.months, "month", false);
    match mode {
        DisplayMode::Short => push_unit(&mut parts, b.days, "day", true),
        DisplayMode::Live => {
            push_unit(&mut parts, b.days, "day", false);
            push_unit(&mut parts, b.hours, "hour", false);
            push_unit(&mut parts, b.minutes, "minute", false);
            push_unit(&mut parts, b.seconds, "second", true);
        }
    }

    parts.join(", ")
}

fn push_unit(parts: &mut Vec<String>, value: u32, unit: &str, always: bool) {
    if value == 0 && !always {
        return;
    }
    let suffix = if value == 1 { "" } else { "s" };
    parts.push(format!("{value} {unit}{suffix}"));
}
