//! Core layout item types and their canonical ordering.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::types::Rect;
use crate::model::{Day, DayOfWeekPosition, Month};

/// One cell of the month → weekday row → day hierarchy.
///
/// # Ordering
/// Every item of month M sorts before every item of month M+1. Within a month the
/// header comes first, then the weekday row in column order, then days by date.
/// The enumerator walks this order and the renderer uses it for z-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutItemType {
    /// Header at the top of a month.
    MonthHeader {
        /// Month the header titles.
        month: Month,
    },
    /// Weekday label in a month's own weekday row.
    DayOfWeekInMonth {
        /// Column of the label.
        position: DayOfWeekPosition,
        /// Month whose row holds the label.
        month: Month,
    },
    /// A day cell.
    Day {
        /// Day shown by the cell.
        day: Day,
    },
}

impl LayoutItemType {
    /// Header of `month`.
    pub fn month_header(month: Month) -> Self {
        Self::MonthHeader { month }
    }

    /// Weekday label at `position` in `month`.
    pub fn day_of_week_in_month(position: DayOfWeekPosition, month: Month) -> Self {
        Self::DayOfWeekInMonth { position, month }
    }

    /// Cell for `day`.
    pub fn day(day: Day) -> Self {
        Self::Day { day }
    }

    /// Month this item belongs to.
    pub fn month(&self) -> Month {
        match self {
            Self::MonthHeader { month } | Self::DayOfWeekInMonth { month, .. } => *month,
            Self::Day { day } => day.month(),
        }
    }

    fn rank_within_month(&self) -> (u8, u32) {
        match self {
            Self::MonthHeader { .. } => (0, 0),
            Self::DayOfWeekInMonth { position, .. } => (1, position.index() as u32),
            Self::Day { day } => (2, day.day()),
        }
    }
}

impl Ord for LayoutItemType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.month()
            .cmp(&other.month())
            .then_with(|| self.rank_within_month().cmp(&other.rank_within_month()))
    }
}

impl PartialOrd for LayoutItemType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LayoutItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthHeader { month } => write!(f, "monthHeader({month})"),
            Self::DayOfWeekInMonth { position, month } => {
                write!(f, "dayOfWeekInMonth({position:?}, {month})")
            }
            Self::Day { day } => write!(f, "day({day})"),
        }
    }
}

/// A layout item type with its frame for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutItem {
    /// What the item is.
    pub item_type: LayoutItemType,
    /// Unaligned frame in scroll space.
    pub frame: Rect,
}

impl LayoutItem {
    /// Pair `item_type` with `frame`.
    pub fn new(item_type: LayoutItemType, frame: Rect) -> Self {
        Self { item_type, frame }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::containing(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn header_sorts_before_weekday_row_before_days() {
        let m = month(2020, 5);
        let header = LayoutItemType::month_header(m);
        let first = LayoutItemType::day_of_week_in_month(DayOfWeekPosition::First, m);
        let last = LayoutItemType::day_of_week_in_month(DayOfWeekPosition::Last, m);
        let day1 = LayoutItemType::day(day(2020, 5, 1));
        assert!(header < first);
        assert!(first < last);
        assert!(last < day1);
    }

    #[test]
    fn all_items_of_a_month_sort_before_the_next_month() {
        let last_day = LayoutItemType::day(day(2020, 5, 31));
        let next_header = LayoutItemType::month_header(month(2020, 6));
        assert!(last_day < next_header);
    }

    #[test]
    fn month_is_reported_for_every_variant() {
        let m = month(2020, 5);
        assert_eq!(LayoutItemType::month_header(m).month(), m);
        assert_eq!(
            LayoutItemType::day_of_week_in_month(DayOfWeekPosition::Third, m).month(),
            m
        );
        assert_eq!(LayoutItemType::day(day(2020, 5, 9)).month(), m);
    }
}
