use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LibrisError;

/// A (year, month, day) stamp on a loan.
///
/// Lateness is measured with a fixed-length calendar: every month counts as 30 days and
/// every year as 365. Stored files depend on this, so it is not a real calendar and the
/// components are not validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl Date {
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }

    /// Day count on the fixed-length calendar: `y*365 + m*30 + d`.
    pub fn day_number(&self) -> i64 {
        i64::from(self.year) * 365 + i64::from(self.month) * 30 + i64::from(self.day)
    }

    /// Signed number of approximate days from `self` to `later`.
    pub fn days_until(&self, later: &Date) -> i64 {
        later.day_number() - self.day_number()
    }

    /// The real calendar date `days` after this one, used to propose due dates. `None` if
    /// this stamp is not a valid calendar date.
    pub fn add_calendar_days(&self, days: u32) -> Option<Date> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)?
            .checked_add_days(Days::new(u64::from(days)))
            .map(Date::from)
    }

    /// Human form with zero-padded month and day (`2025-01-05`).
    pub fn padded(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Encoded form as written to the records file (`2025-1-5`).
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = LibrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LibrisError::Format(format!("invalid date '{}', expected Y-M-D", s));
        let mut parts = s.trim().split('-');
        let mut next = || -> Result<i32, LibrisError> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(invalid)
        };
        let (year, month, day) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(year, month, day))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month() as i32, date.day() as i32)
    }
}
