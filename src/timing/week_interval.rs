use chrono::Weekday;
use serde::Serialize;

use super::fingerprint::Fingerprint;
use super::time_of_day::TimeOfDay;

/// One working interval inside a single day of the week, bounds inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeekInterval {
    day: Weekday,
    from: TimeOfDay,
    to: TimeOfDay,
}

impl WeekInterval {
    pub fn new(day: Weekday, from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { day, from, to }
    }

    /// Rebuilds an interval from its stored fingerprints. The day is taken
    /// from `from`.
    pub fn from_fingerprints(from: Fingerprint, to: Fingerprint) -> Self {
        let (day, from) = from.decode();
        let (_, to) = to.decode();
        Self { day, from, to }
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn from(&self) -> TimeOfDay {
        self.from
    }

    pub fn to(&self) -> TimeOfDay {
        self.to
    }

    pub fn from_fingerprint(&self) -> Fingerprint {
        Fingerprint::encode(self.day, self.from)
    }

    pub fn to_fingerprint(&self) -> Fingerprint {
        Fingerprint::encode(self.day, self.to)
    }

    pub fn contains(&self, moment: Fingerprint) -> bool {
        self.from_fingerprint() <= moment && moment <= self.to_fingerprint()
    }
}
