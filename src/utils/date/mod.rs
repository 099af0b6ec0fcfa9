// Date utility functions shared by the timeline and interaction modules

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// The following calendar day, saturating at the end of chrono's range.
pub fn day_after(day: NaiveDate) -> NaiveDate {
    day.succ_opt().unwrap_or(day)
}

pub fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    day.checked_add_signed(Duration::days(days)).unwrap_or(day)
}

/// Offset of `moment` from midnight of `day`; negative before, beyond 24h after.
pub fn time_since_day_start(day: NaiveDate, moment: NaiveDateTime) -> Duration {
    moment - start_of_day(day)
}

/// First slot boundary strictly after (`forward`) or strictly before
/// `moment`. Boundaries are counted from midnight of the moment's own day.
pub fn step_to_slot(moment: NaiveDateTime, slot: Duration, forward: bool) -> NaiveDateTime {
    let slot_seconds = slot.num_seconds().max(1);
    let day_start = start_of_day(moment.date());
    let since = (moment - day_start).num_seconds();
    let boundary = if forward {
        (since.div_euclid(slot_seconds) + 1) * slot_seconds
    } else {
        ((since + slot_seconds - 1).div_euclid(slot_seconds) - 1) * slot_seconds
    };
    day_start + Duration::seconds(boundary)
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
