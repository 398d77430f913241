use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;

/// A date range, bounds inclusive, during which a shop is closed whatever its
/// weekly schedule says. A missing `to_date` leaves it open-ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayOff {
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
}

impl DayOff {
    pub fn new(from_date: NaiveDate, to_date: Option<NaiveDate>) -> Result<Self, ValidationError> {
        if let Some(to_date) = to_date {
            if from_date > to_date {
                return Err(ValidationError::DayOffRange);
            }
        }
        Ok(Self { from_date, to_date })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from_date <= date && self.to_date.map_or(true, |to_date| date <= to_date)
    }
}
