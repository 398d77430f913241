use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::schedule::compile;
use super::time_of_day::TimeOfDay;
use super::week_interval::WeekInterval;
use crate::error::ValidationError;

/// A pause inside a working day. The shop closes the minute before `from`
/// and reopens at `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    #[serde(rename = "from_time")]
    pub from: TimeOfDay,
    #[serde(rename = "to_time")]
    pub to: TimeOfDay,
}

impl BreakInterval {
    pub fn new(from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { from, to }
    }

    /// Parses `FROM-TO`, e.g. `11.30-12.30`.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let (from, to) = text
            .split_once('-')
            .ok_or_else(|| ValidationError::MalformedBreak(text.to_string()))?;
        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

/// The raw opening hours of one day as an owner enters them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Daily {
    #[serde(rename = "from_time")]
    pub opening: TimeOfDay,
    #[serde(rename = "to_time")]
    pub closing: TimeOfDay,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
}

impl Daily {
    pub fn new(opening: TimeOfDay, closing: TimeOfDay, breaks: Vec<BreakInterval>) -> Self {
        Self {
            opening,
            closing,
            breaks,
        }
    }

    /// Checks that every break is non-empty, falls strictly inside the
    /// opening hours and starts strictly after the previous one ends.
    ///
    /// On a day that runs past midnight the breaks must still be taken
    /// before midnight: the compiler only moves a segment to the next day
    /// when it ends earlier than it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let crosses_midnight = self.closing < self.opening;
        let mut previous: Option<&BreakInterval> = None;
        for (index, pause) in self.breaks.iter().enumerate() {
            if pause.from >= pause.to {
                return Err(ValidationError::EmptyBreak { index });
            }
            if pause.from <= self.opening || (!crosses_midnight && pause.to >= self.closing) {
                return Err(ValidationError::BreakOutsideHours { index });
            }
            if let Some(previous) = previous {
                if pause.from <= previous.to {
                    return Err(ValidationError::UnorderedBreak { index });
                }
            }
            previous = Some(pause);
        }
        Ok(())
    }

    pub fn compile(&self, day: Weekday) -> Vec<WeekInterval> {
        compile(day, self.opening, self.closing, &self.breaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(text: &str) -> TimeOfDay {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_break() {
        let pause = BreakInterval::parse("11.30-12:30").unwrap();
        assert_eq!(pause, BreakInterval::new(t("11.30"), t("12.30")));
        assert!(matches!(
            BreakInterval::parse("11.30"),
            Err(ValidationError::MalformedBreak(_))
        ));
        assert!(matches!(
            BreakInterval::parse("11.30-25.00"),
            Err(ValidationError::Time(_))
        ));
    }

    #[test]
    fn test_validate_accepts_ordered_breaks() {
        let daily = Daily::new(
            t("08.00"),
            t("20.00"),
            vec![
                BreakInterval::new(t("10.00"), t("10.15")),
                BreakInterval::new(t("10.16"), t("10.30")),
                BreakInterval::new(t("13.00"), t("14.00")),
            ],
        );
        assert_eq!(daily.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_touching_breaks() {
        // The second break would leave a segment ending before it starts
        let daily = Daily::new(
            t("08.00"),
            t("20.00"),
            vec![
                BreakInterval::new(t("10.00"), t("10.15")),
                BreakInterval::new(t("10.15"), t("10.30")),
            ],
        );
        assert_eq!(
            daily.validate(),
            Err(ValidationError::UnorderedBreak { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let daily = Daily::new(
            t("08.00"),
            t("20.00"),
            vec![
                BreakInterval::new(t("12.00"), t("13.00")),
                BreakInterval::new(t("12.30"), t("14.00")),
            ],
        );
        assert_eq!(
            daily.validate(),
            Err(ValidationError::UnorderedBreak { index: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_empty_break() {
        let daily = Daily::new(
            t("08.00"),
            t("20.00"),
            vec![BreakInterval::new(t("12.00"), t("12.00"))],
        );
        assert_eq!(daily.validate(), Err(ValidationError::EmptyBreak { index: 0 }));
    }

    #[test]
    fn test_validate_rejects_break_outside_hours() {
        let abutting_open = Daily::new(
            t("10.00"),
            t("18.00"),
            vec![BreakInterval::new(t("10.00"), t("11.00"))],
        );
        assert_eq!(
            abutting_open.validate(),
            Err(ValidationError::BreakOutsideHours { index: 0 })
        );

        let past_close = Daily::new(
            t("10.00"),
            t("18.00"),
            vec![BreakInterval::new(t("17.00"), t("19.00"))],
        );
        assert_eq!(
            past_close.validate(),
            Err(ValidationError::BreakOutsideHours { index: 0 })
        );
    }

    #[test]
    fn test_validate_overnight_day() {
        let before_midnight = Daily::new(
            t("20.00"),
            t("03.00"),
            vec![BreakInterval::new(t("22.00"), t("22.30"))],
        );
        assert_eq!(before_midnight.validate(), Ok(()));

        let after_midnight = Daily::new(
            t("20.00"),
            t("03.00"),
            vec![BreakInterval::new(t("01.00"), t("01.30"))],
        );
        assert_eq!(
            after_midnight.validate(),
            Err(ValidationError::BreakOutsideHours { index: 0 })
        );
    }

    #[test]
    fn test_deserialize() {
        let daily: Daily = serde_json::from_str(
            r#"{"from_time": "11.00", "to_time": "20.00",
                "breaks": [{"from_time": "11.30", "to_time": "12.30"}]}"#,
        )
        .unwrap();
        assert_eq!(daily.opening, t("11.00"));
        assert_eq!(daily.breaks.len(), 1);

        let no_breaks: Daily =
            serde_json::from_str(r#"{"from_time": "09:00", "to_time": "18:00"}"#).unwrap();
        assert!(no_breaks.breaks.is_empty());
    }
}
