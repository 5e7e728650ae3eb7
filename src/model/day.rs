//! Day value type, closed day ranges, and weekday column positions.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use super::error::RangeError;
use super::month::Month;

/// A single day within a month.
///
/// Ordering compares the month first, then the day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Day {
    month: Month,
    day: u32,
}

impl Day {
    /// Day containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            month: Month::containing(date),
            day: date.day(),
        }
    }

    /// Day `day` of `month`, if that day exists.
    pub fn new(month: Month, day: u32) -> Option<Self> {
        (1..=month.number_of_days())
            .contains(&day)
            .then_some(Self { month, day })
    }

    /// Month this day belongs to.
    pub fn month(&self) -> Month {
        self.month
    }

    /// 1-based day of the month.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// First day of `month`.
    pub fn first_of(month: Month) -> Self {
        Self { month, day: 1 }
    }

    /// Last day of `month`.
    pub fn last_of(month: Month) -> Self {
        Self {
            month,
            day: month.number_of_days(),
        }
    }

    /// Calendar date of this day.
    pub fn date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.month.proleptic_year(), self.month.month(), self.day)
            .expect("Day is only constructed from representable dates")
    }

    /// The following day, if representable.
    pub fn next(&self) -> Option<Self> {
        if self.day < self.month.number_of_days() {
            Some(Self {
                month: self.month,
                day: self.day + 1,
            })
        } else {
            self.month.next().map(Self::first_of)
        }
    }

    /// The preceding day, if representable.
    pub fn previous(&self) -> Option<Self> {
        if self.day > 1 {
            Some(Self {
                month: self.month,
                day: self.day - 1,
            })
        } else {
            self.month.previous().map(Self::last_of)
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.month, self.day)
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Closed, inclusive range of days.
///
/// # Invariants
/// - `lower_bound <= upper_bound`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DayRange {
    lower_bound: Day,
    upper_bound: Day,
}

impl DayRange {
    /// Create a range, rejecting inverted bounds.
    pub fn new(lower_bound: Day, upper_bound: Day) -> Result<Self, RangeError> {
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

    /// Range covering the days of an inclusive date range.
    pub fn from_dates(lower: NaiveDate, upper: NaiveDate) -> Result<Self, RangeError> {
        Self::new(Day::containing(lower), Day::containing(upper))
    }

    /// First day in the range.
    pub fn lower_bound(&self) -> Day {
        self.lower_bound
    }

    /// Last day in the range.
    pub fn upper_bound(&self) -> Day {
        self.upper_bound
    }

    /// Whether `day` lies within the range, bounds included.
    pub fn contains(&self, day: &Day) -> bool {
        self.lower_bound <= *day && *day <= self.upper_bound
    }

    /// Whether the two ranges share at least one day.
    pub fn overlaps(&self, other: &DayRange) -> bool {
        self.lower_bound <= other.upper_bound && other.lower_bound <= self.upper_bound
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.lower_bound, self.upper_bound)
    }
}

/// Column of a weekday within a week row, relative to the calendar's first weekday.
///
/// Cyclic: the position after `Last` is `First`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeekPosition {
    /// Leftmost column, the calendar's first weekday.
    First,
    /// Second column.
    Second,
    /// Third column.
    Third,
    /// Fourth column.
    Fourth,
    /// Fifth column.
    Fifth,
    /// Sixth column.
    Sixth,
    /// Rightmost column.
    Last,
}

impl DayOfWeekPosition {
    /// Columns in a week row.
    pub const NUMBER_OF_POSITIONS: usize = 7;

    /// All positions in column order.
    pub const ALL: [DayOfWeekPosition; 7] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Fifth,
        Self::Sixth,
        Self::Last,
    ];

    /// Position for a 0-based column index, wrapping modulo 7.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::NUMBER_OF_POSITIONS]
    }

    /// 0-based column index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Next position, wrapping from `Last` to `First`.
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Previous position, wrapping from `First` to `Last`.
    pub fn previous(&self) -> Self {
        Self::from_index(self.index() + Self::NUMBER_OF_POSITIONS - 1)
    }
}
