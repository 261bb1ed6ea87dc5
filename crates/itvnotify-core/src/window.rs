//! Reminder-window decision logic.
//!
//! Decides, for a single vehicle record and a pair of weekdays, whether a
//! notification must go out today. This is the only decision-bearing code in
//! the system; everything around it is I/O plumbing, so this function is kept
//! pure and free of clock access; callers pass the weekdays in.

/// Exact remaining-day counts that trigger a scheduled milestone reminder.
pub const MILESTONE_DAYS: [i64; 4] = [31, 25, 20, 15];

/// Below this remaining-day count every non-Sunday day is a reminder day.
/// Includes negative values: overdue vehicles are nagged daily.
pub const URGENCY_THRESHOLD: i64 = 13;

/// Weekday encoding: 0 = Monday .. 6 = Sunday (chrono's
/// `Weekday::num_days_from_monday`).
pub const SUNDAY: u32 = 6;

/// Returns `true` when a reminder is due today for a vehicle with
/// `days_remaining` days until its inspection deadline.
///
/// Rules, in order:
/// 1. Sunday blackout: nothing is ever sent on Sunday.
/// 2. Milestone match: `days_remaining` in {31, 25, 20, 15}.
/// 3. Urgency window: `days_remaining < 13`, overdue included.
/// 4. Sunday makeup: a milestone that fell on Sunday fires the next day,
///    seen as {30, 24, 19, 14} when yesterday was Sunday.
pub fn is_due(days_remaining: i64, weekday_today: u32, weekday_yesterday: u32) -> bool {
    if weekday_today == SUNDAY {
        return false;
    }
    if MILESTONE_DAYS.contains(&days_remaining) {
        return true;
    }
    if days_remaining < URGENCY_THRESHOLD {
        return true;
    }
    weekday_yesterday == SUNDAY && MILESTONE_DAYS.iter().any(|m| days_remaining == m - 1)
}
