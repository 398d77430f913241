use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::Timelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TimeError;

/// A wall clock time with minute precision.
///
/// Ordering is by (hour, minute). Values are always in range: the only ways to
/// build one are [TimeOfDay::new] and parsing, both of which check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

pub const START_OF_DAY: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
pub const END_OF_DAY: TimeOfDay = TimeOfDay { hour: 23, minute: 59 };

fn time_regex() -> &'static Regex {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    TIME_REGEX.get_or_init(|| Regex::new(r"^(\d{1,2})[.:](\d{2})$").expect("static regex"))
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// The minute before this one. Saturates at 00:00.
    pub fn minus_minute(&self) -> Self {
        let total = self.minutes().saturating_sub(1);
        Self {
            hour: total / 60,
            minute: total % 60,
        }
    }

    pub fn of<T: Timelike>(time: &T) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    /// Accepts `HH.MM` and `HH:MM`, with a one digit hour allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = time_regex()
            .captures(s.trim())
            .ok_or_else(|| TimeError::Malformed(s.to_string()))?;
        // The regex only lets digits through
        let hour: u32 = captures[1]
            .parse()
            .map_err(|_| TimeError::Malformed(s.to_string()))?;
        let minute: u32 = captures[2]
            .parse()
            .map_err(|_| TimeError::Malformed(s.to_string()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}", self.hour, self.minute)
    }
}
