//! Calendar date keys.
//!
//! A `DateKey` is the UTC calendar day rendered as `YYYY-MM-DD`. It is the
//! join key between the day being viewed and the log record that applies.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestError;

const FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn today() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn prev(&self) -> Self {
        self.0.checked_sub_days(Days::new(1)).map(Self).unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.0.checked_add_days(Days::new(1)).map(Self).unwrap_or(*self)
    }

    /// `n` days before this one, saturating at the calendar's lower bound.
    pub fn minus_days(&self, n: u64) -> Self {
        self.0.checked_sub_days(Days::new(n)).map(Self).unwrap_or(*self)
    }

    /// Long human form, e.g. "Monday, October 19".
    pub fn long_label(&self) -> String {
        self.0.format("%A, %B %-d").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Full ISO timestamps are accepted and truncated to their date part.
        let day = s.trim().split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(day, FORMAT)
            .map(Self)
            .map_err(|_| QuestError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = QuestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}
