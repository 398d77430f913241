use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Weekday};
use serde::Serialize;

use super::time_of_day::TimeOfDay;
use crate::error::TimeError;

/// A moment in the week encoded as `DHHMM`.
///
/// D is the day of week counted from Monday = 0. Within one day the numeric
/// order matches the order of the moments, which lets the store answer
/// "is this moment inside a working interval" with a plain range comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub fn encode(day: Weekday, time: TimeOfDay) -> Self {
        Self(day.num_days_from_monday() * 10000 + time.hour() * 100 + time.minute())
    }

    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::encode(instant.weekday(), TimeOfDay::of(instant))
    }

    pub fn decode(&self) -> (Weekday, TimeOfDay) {
        let day = weekday_from_index(self.0 / 10000);
        let hm = self.0 % 10000;
        // Every constructor keeps the time part in range
        let time = TimeOfDay::new(hm / 100, hm % 100).unwrap_or(super::time_of_day::START_OF_DAY);
        (day, time)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Monday = 0 .. Sunday = 6. Anything above 6 folds back into the week.
pub fn weekday_from_index(index: u32) -> Weekday {
    match index % 7 {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

impl TryFrom<u32> for Fingerprint {
    type Error = TimeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let day = value / 10000;
        let hm = value % 10000;
        if day > 6 {
            return Err(TimeError::Fingerprint(value.to_string()));
        }
        TimeOfDay::new(hm / 100, hm % 100)?;
        Ok(Self(value))
    }
}

impl FromStr for Fingerprint {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::Fingerprint(s.to_string()));
        }
        let value: u32 = s.parse().map_err(|_| TimeError::Fingerprint(s.to_string()))?;
        Self::try_from(value)
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// Renders only the time part of a fingerprint, as `HH.MM`.
pub fn format_time(fingerprint: Fingerprint) -> String {
    fingerprint.decode().1.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_encode() {
        let t = TimeOfDay::new(9, 5).unwrap();
        assert_eq!(Fingerprint::encode(Weekday::Mon, t).as_u32(), 905);
        assert_eq!(Fingerprint::encode(Weekday::Mon, t).to_string(), "00905");
        assert_eq!(Fingerprint::encode(Weekday::Sun, t).to_string(), "60905");
    }

    #[test]
    fn test_decode() {
        let fp: Fingerprint = "41230".parse().unwrap();
        assert_eq!(fp.decode(), (Weekday::Fri, TimeOfDay::new(12, 30).unwrap()));
        assert_eq!(format_time(fp), "12.30");
    }

    #[test]
    fn test_of_instant() {
        // 2018-12-20 was a Thursday
        let instant = NaiveDate::from_ymd_opt(2018, 12, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(Fingerprint::of::<Utc>(&instant).to_string(), "30800");
    }

    #[test]
    fn test_text_and_numeric_order_agree() {
        let a = Fingerprint::try_from(959).unwrap();
        let b = Fingerprint::try_from(1000).unwrap();
        let c = Fingerprint::try_from(10000).unwrap();
        assert!(a < b && b < c);
        assert!(a.to_string() < b.to_string() && b.to_string() < c.to_string());
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(Fingerprint::try_from(70000).is_err());
        assert!(Fingerprint::try_from(12400).is_err());
        assert!("1230".parse::<Fingerprint>().is_err());
        assert!("0a230".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn test_weekday_from_index_wraps() {
        assert_eq!(weekday_from_index(6), Weekday::Sun);
        assert_eq!(weekday_from_index(7), Weekday::Mon);
    }
}
