//! Occurrence calculation.
//!
//! Turns an alarm definition plus a reference instant into the next concrete
//! firing instant. Pure wall-clock arithmetic at minute granularity -- the
//! reference is always an explicit parameter, never the system clock, so the
//! calculator is deterministic under test.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};

use super::Alarm;

/// Zero out seconds and sub-second components. The whole model reasons at
/// minute granularity.
pub(crate) fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or_default();
    t.date().and_time(time)
}

/// Compute the next instant at which `alarm` should ring, strictly after
/// `reference`.
///
/// One-off alarms resolve to today at the alarm time if that is still ahead,
/// otherwise the same time tomorrow. Repeating alarms scan the next seven
/// days in ascending order and pick the earliest day whose weekday is in
/// `repeat_days` and whose target time is strictly after the reference. An
/// alarm time exactly equal to the reference minute is never selected, which
/// guards against re-firing inside the evaluation minute.
pub fn next_occurrence(alarm: &Alarm, reference: NaiveDateTime) -> NaiveDateTime {
    let reference = truncate_to_minute(reference);
    let target_today = reference.date().and_time(alarm.time_of_day.as_time());

    if alarm.is_one_off() {
        return if target_today > reference {
            target_today
        } else {
            target_today + Duration::days(1)
        };
    }

    for offset in 0..7 {
        let date = reference.date() + Duration::days(offset);
        let weekday = date.weekday().num_days_from_sunday() as u8;
        if !alarm.repeats_on(weekday) {
            continue;
        }
        let candidate = date.and_time(alarm.time_of_day.as_time());
        if candidate > reference {
            return candidate;
        }
    }

    // Unreachable with a non-empty, validated repeat set, but the contract
    // is total: one week after today's target time.
    target_today + Duration::days(7)
}
