//! Month value type and closed month ranges.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use super::error::RangeError;

/// A calendar month.
///
/// Stores the era-relative year the way calendars report it: era 1 is CE,
/// era 0 is BCE where years count backwards from 1. Ordering is chronological
/// across eras.
///
/// Months are only constructed from representable dates, so every `Month`
/// has a valid first and last date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month {
    era: u8,
    year: u32,
    month: u32,
    is_in_gregorian_calendar: bool,
}

impl Month {
    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let (is_ce, year) = date.year_ce();
        Self {
            era: u8::from(is_ce),
            year,
            month: date.month(),
            is_in_gregorian_calendar: true,
        }
    }

    /// Month from a proleptic Gregorian year (year 0 is 1 BCE) and a 1-based month.
    ///
    /// Returns `None` if `month` is not in `1..=12` or the month cannot be represented.
    pub fn new(proleptic_year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(proleptic_year, month, 1).map(Self::containing)
    }

    /// Era (0 = BCE, 1 = CE).
    pub fn era(&self) -> u8 {
        self.era
    }

    /// Era-relative year (always >= 1).
    pub fn year(&self) -> u32 {
        self.year
    }

    /// 1-based month of the year.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Always true: months are proleptic Gregorian.
    pub fn is_in_gregorian_calendar(&self) -> bool {
        self.is_in_gregorian_calendar
    }

    /// Proleptic Gregorian year, as used by chrono (1 BCE is year 0).
    pub fn proleptic_year(&self) -> i32 {
        let year = self.year as i32;
        if self.era == 1 {
            year
        } else {
            1 - year
        }
    }

    /// Month `n` months away from this one, if representable.
    pub fn checked_add_months(&self, n: i32) -> Option<Self> {
        let index = i64::from(self.proleptic_year()) * 12 + i64::from(self.month - 1) + i64::from(n);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;
        Self::new(year, month)
    }

    /// The following month, if representable.
    pub fn next(&self) -> Option<Self> {
        self.checked_add_months(1)
    }

    /// The preceding month, if representable.
    pub fn previous(&self) -> Option<Self> {
        self.checked_add_months(-1)
    }

    /// First date of the month.
    pub fn first_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.proleptic_year(), self.month, 1)
            .expect("Month is only constructed from representable dates")
    }

    /// Number of days in the month.
    pub fn number_of_days(&self) -> u32 {
        let first = self.first_date();
        match first.checked_add_months(chrono::Months::new(1)) {
            Some(next_first) => (next_first - first).num_days() as u32,
            // Last representable month: count forward until the date runs out.
            None => (28..=31)
                .rev()
                .find(|day| NaiveDate::from_ymd_opt(self.proleptic_year(), self.month, *day).is_some())
                .unwrap_or(28),
        }
    }

    /// Last date of the month.
    pub fn last_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.proleptic_year(), self.month, self.number_of_days())
            .expect("Month is only constructed from representable dates")
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> Ordering {
        self.proleptic_year()
            .cmp(&other.proleptic_year())
            .then(self.month.cmp(&other.month))
            .then(self.is_in_gregorian_calendar.cmp(&other.is_in_gregorian_calendar))
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.proleptic_year(), self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Closed, inclusive range of months.
///
/// # Invariants
/// - `lower_bound <= upper_bound`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthRange {
    lower_bound: Month,
    upper_bound: Month,
}

impl MonthRange {
    /// Create a range, rejecting inverted bounds.
    pub fn new(lower_bound: Month, upper_bound: Month) -> Result<Self, RangeError> {
        if lower_bound > upper_bound {
            return Err(RangeError::Inverted {
                lower: lower_bound.to_string(),
                upper: upper_bound.to_string(),
            });
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }

    /// First month in the range.
    pub fn lower_bound(&self) -> Month {
        self.lower_bound
    }

    /// Last month in the range.
    pub fn upper_bound(&self) -> Month {
        self.upper_bound
    }

    /// Whether `month` lies within the range, bounds included.
    pub fn contains(&self, month: &Month) -> bool {
        self.lower_bound <= *month && *month <= self.upper_bound
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.lower_bound, self.upper_bound)
    }
}
