use chrono::{DateTime, TimeZone};

use super::day_off::DayOff;
use super::fingerprint::Fingerprint;
use super::week_interval::WeekInterval;

/// Whether a shop with these rows is open at `instant`.
///
/// A day off covering the instant's date wins over the weekly schedule.
/// Otherwise the instant must fall inside at least one interval, bounds
/// included.
pub fn is_open_at<Tz: TimeZone>(
    intervals: &[WeekInterval],
    day_offs: &[DayOff],
    instant: &DateTime<Tz>,
) -> bool {
    let moment = Fingerprint::of(instant);
    if is_day_off(day_offs, instant) {
        return false;
    }
    intervals.iter().any(|interval| interval.contains(moment))
}

pub fn is_day_off<Tz: TimeZone>(day_offs: &[DayOff], instant: &DateTime<Tz>) -> bool {
    let date = instant.date_naive();
    day_offs.iter().any(|day_off| day_off.covers(date))
}
