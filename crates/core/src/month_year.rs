//! Month-granularity dates (`MM-YYYY`).
//!
//! Subscriptions are active over whole months. There is no day-of-month
//! concept anywhere in the domain: two values compare by year, then month.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Accepted wire format: two-digit month 01-12, a dash, four-digit year.
pub const MONTH_YEAR_PATTERN: &str = r"^(0[1-9]|1[0-2])-[0-9]{4}$";

static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MONTH_YEAR_PATTERN).expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthYearError {
    #[error("expected MM-YYYY, got {0:?}")]
    Format(String),

    #[error("year {0} is outside 0000-9999")]
    YearOutOfRange(i32),
}

/// A calendar month. Field order matters: the derived ordering compares
/// `year` first, then `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    year: u16,
    month: u8,
}

impl MonthYear {
    /// Build from components. Returns `None` unless `month` is 1-12 and
    /// `year` fits in four digits.
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if (1..=12).contains(&month) && year <= 9999 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Strictly parse `MM-YYYY`. The empty string is rejected.
    pub fn parse(s: &str) -> Result<Self, MonthYearError> {
        if !MONTH_YEAR_RE.is_match(s) {
            return Err(MonthYearError::Format(s.to_string()));
        }
        // The regex guarantees two ASCII digits, a dash, four ASCII digits.
        let month: u8 = s[..2]
            .parse()
            .map_err(|_| MonthYearError::Format(s.to_string()))?;
        let year: u16 = s[3..]
            .parse()
            .map_err(|_| MonthYearError::Format(s.to_string()))?;
        Self::new(month, year).ok_or_else(|| MonthYearError::Format(s.to_string()))
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// The first calendar day of this month, used as the storage encoding.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), 1)
            .expect("month 1-12 and year 0-9999 always form a valid date")
    }

    /// Truncate a calendar date to its month.
    pub fn from_date(date: NaiveDate) -> Result<Self, MonthYearError> {
        let year = u16::try_from(date.year())
            .ok()
            .filter(|y| *y <= 9999)
            .ok_or(MonthYearError::YearOutOfRange(date.year()))?;
        // `Datelike::month` is always 1-12.
        Ok(Self {
            year,
            month: date.month() as u8,
        })
    }
}

/// True iff `s` is a well-formed `MM-YYYY` value. Empty is not valid.
pub fn is_valid(s: &str) -> bool {
    MonthYear::parse(s).is_ok()
}

/// Like [`is_valid`], but an empty string counts as "not supplied" and passes.
///
/// Used for optional fields such as a subscription's end date.
pub fn is_blank_or_valid(s: &str) -> bool {
    s.is_empty() || is_valid(s)
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl FromStr for MonthYear {
    type Err = MonthYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
