use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::daily::{BreakInterval, Daily};
use super::fingerprint::weekday_from_index;
use super::time_of_day::{TimeOfDay, END_OF_DAY, START_OF_DAY};
use super::week_interval::WeekInterval;
use crate::error::ValidationError;

/// Compiles one day's opening hours into working intervals.
///
/// The breaks cut `[open, close]` into `breaks.len() + 1` segments. A segment
/// ends the minute before a break starts and the next one resumes exactly at
/// the break's end. Any segment whose end is earlier than its start runs past
/// midnight and is split in two, the second half landing on the following day
/// (Sunday wraps to Monday).
///
/// Nothing is validated here. Breaks are taken in the order given and
/// degenerate segments are emitted as they come out.
pub fn compile(
    day: Weekday,
    open: TimeOfDay,
    close: TimeOfDay,
    breaks: &[BreakInterval],
) -> Vec<WeekInterval> {
    let mut segments: Vec<(TimeOfDay, TimeOfDay)> = Vec::with_capacity(breaks.len() + 1);
    let mut from = open;
    for pause in breaks {
        segments.push((from, pause.from.minus_minute()));
        from = pause.to;
    }
    segments.push((from, close));

    let mut intervals = Vec::with_capacity(segments.len() + 1);
    for (from, to) in segments {
        if crosses_midnight(from, to) {
            intervals.push(WeekInterval::new(day, from, END_OF_DAY));
            intervals.push(WeekInterval::new(day.succ(), START_OF_DAY, to));
        } else {
            intervals.push(WeekInterval::new(day, from, to));
        }
    }
    intervals
}

fn crosses_midnight(from: TimeOfDay, to: TimeOfDay) -> bool {
    to < from && from <= END_OF_DAY
}

/// A default week: Monday first, `None` for days the shop stays closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTemplate {
    days: [Option<Daily>; 7],
}

impl WeekTemplate {
    pub fn new(days: [Option<Daily>; 7]) -> Self {
        Self { days }
    }

    /// The same hours on every day of the week.
    pub fn every_day(daily: Daily) -> Self {
        Self {
            days: std::array::from_fn(|_| Some(daily.clone())),
        }
    }

    pub fn get(&self, day: Weekday) -> Option<&Daily> {
        self.days[day.num_days_from_monday() as usize].as_ref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for daily in self.days.iter().flatten() {
            daily.validate()?;
        }
        Ok(())
    }

    /// Compiles every open day. Rows are grouped under the day they were
    /// entered for, so a day's overflow past midnight stays with it.
    pub fn compile(&self) -> Vec<(Weekday, Vec<WeekInterval>)> {
        self.days
            .iter()
            .enumerate()
            .filter_map(|(index, daily)| {
                let day = weekday_from_index(index as u32);
                daily.as_ref().map(|daily| (day, daily.compile(day)))
            })
            .collect()
    }
}

impl Default for WeekTemplate {
    /// Every day from 08.00 until 02.00 the next morning, closed 11.30 to 12.30.
    fn default() -> Self {
        let time = |hour, minute| TimeOfDay::new(hour, minute).unwrap_or(START_OF_DAY);
        Self::every_day(Daily::new(
            time(8, 0),
            time(2, 0),
            vec![BreakInterval::new(time(11, 30), time(12, 30))],
        ))
    }
}
