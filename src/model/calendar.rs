//! Calendar arithmetic backed by chrono's proleptic Gregorian dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::day::{Day, DayOfWeekPosition};
use super::month::Month;

/// Calendar arithmetic provider.
///
/// Answers the date questions the layout engine asks: which month/day contains a
/// date, where a date falls in its week row, and which row of its month it occupies.
/// The only configurable property is the first weekday, which determines column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calendar {
    first_weekday: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl Calendar {
    /// Calendar whose weeks start on `first_weekday`.
    pub fn new(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    /// Weekday shown in the first column.
    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Month that `date` falls in.
    pub fn month_containing(&self, date: NaiveDate) -> Month {
        Month::containing(date)
    }

    /// Day for `date`.
    pub fn day_containing(&self, date: NaiveDate) -> Day {
        Day::containing(date)
    }

    /// First date of `month`.
    pub fn first_date(&self, month: Month) -> NaiveDate {
        month.first_date()
    }

    /// Last date of `month`.
    pub fn last_date(&self, month: Month) -> NaiveDate {
        month.last_date()
    }

    /// Number of days in `month`.
    pub fn days_in_month(&self, month: Month) -> u32 {
        month.number_of_days()
    }

    /// `n` months after `month` (negative `n` goes backwards), if representable.
    pub fn month_by_adding(&self, n: i32, month: Month) -> Option<Month> {
        month.checked_add_months(n)
    }

    /// `n` days after `day` (negative `n` goes backwards), if representable.
    pub fn day_by_adding(&self, n: i64, day: Day) -> Option<Day> {
        let date = day.date();
        let shifted = if n >= 0 {
            date.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            date.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        shifted.map(Day::containing)
    }

    /// Column of `date` in its week row.
    pub fn day_of_week_position(&self, date: NaiveDate) -> DayOfWeekPosition {
        let weekday = date.weekday().num_days_from_monday() as usize;
        let first = self.first_weekday.num_days_from_monday() as usize;
        DayOfWeekPosition::from_index(weekday + DayOfWeekPosition::NUMBER_OF_POSITIONS - first)
    }

    /// 0-based week row of `date` within its month.
    pub fn row_in_month(&self, date: NaiveDate) -> u32 {
        let first_of_month = date.with_day(1).unwrap_or(date);
        let leading_blanks = self.day_of_week_position(first_of_month).index() as u32;
        (date.day() - 1 + leading_blanks) / DayOfWeekPosition::NUMBER_OF_POSITIONS as u32
    }

    /// Weekday shown in the given column.
    pub fn weekday_at(&self, position: DayOfWeekPosition) -> Weekday {
        let mut weekday = self.first_weekday;
        for _ in 0..position.index() {
            weekday = weekday.succ();
        }
        weekday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_of_week_position_is_relative_to_first_weekday() {
        // 2020-11-01 is a Sunday.
        let sunday_first = Calendar::new(Weekday::Sun);
        let monday_first = Calendar::new(Weekday::Mon);
        assert_eq!(
            sunday_first.day_of_week_position(date(2020, 11, 1)),
            DayOfWeekPosition::First
        );
        assert_eq!(
            monday_first.day_of_week_position(date(2020, 11, 1)),
            DayOfWeekPosition::Last
        );
        assert_eq!(
            monday_first.day_of_week_position(date(2020, 11, 2)),
            DayOfWeekPosition::First
        );
    }

    #[test]
    fn row_in_month_accounts_for_leading_blanks() {
        // 2020-12-01 is a Tuesday: with Sunday first, two leading blanks.
        let calendar = Calendar::default();
        assert_eq!(calendar.row_in_month(date(2020, 12, 1)), 0);
        assert_eq!(calendar.row_in_month(date(2020, 12, 5)), 0);
        assert_eq!(calendar.row_in_month(date(2020, 12, 6)), 1);
        assert_eq!(calendar.row_in_month(date(2020, 12, 31)), 4);
    }

    #[test]
    fn day_by_adding_moves_in_both_directions() {
        let calendar = Calendar::default();
        let start = Day::containing(date(2020, 2, 28));
        assert_eq!(
            calendar.day_by_adding(2, start),
            Some(Day::containing(date(2020, 3, 1)))
        );
        assert_eq!(
            calendar.day_by_adding(-28, start),
            Some(Day::containing(date(2020, 1, 31)))
        );
    }

    #[test]
    fn weekday_at_walks_from_first_weekday() {
        let calendar = Calendar::new(Weekday::Mon);
        assert_eq!(calendar.weekday_at(DayOfWeekPosition::First), Weekday::Mon);
        assert_eq!(calendar.weekday_at(DayOfWeekPosition::Last), Weekday::Sun);
    }
}
