//! Layout item type enumerator.
//!
//! Knows what comes immediately before and after any [`LayoutItemType`] and drives
//! a bidirectional walk from a starting item. Every step checks range containment
//! before yielding, so a walk can never run past the configured months or days.

use std::iter;
use std::ops::ControlFlow;

use super::layout_item::LayoutItemType;
use crate::model::{Day, DayOfWeekPosition, DayRange, Month, MonthRange};

/// Walks layout item types in canonical order.
#[derive(Debug, Clone)]
pub struct LayoutItemTypeEnumerator {
    month_range: MonthRange,
    day_range: DayRange,
    days_of_week_pinned: bool,
}

impl LayoutItemTypeEnumerator {
    /// `days_of_week_pinned` removes per-month weekday rows from the sequence.
    pub fn new(month_range: MonthRange, day_range: DayRange, days_of_week_pinned: bool) -> Self {
        Self {
            month_range,
            day_range,
            days_of_week_pinned,
        }
    }

    /// Walk backward from (not including) `start`, then forward from (including) `start`.
    ///
    /// Each direction ends when the walk leaves range or its callback breaks.
    /// Out-of-range items are never passed to a callback.
    pub fn enumerate_item_types(
        &self,
        start: LayoutItemType,
        mut backward: impl FnMut(LayoutItemType) -> ControlFlow<()>,
        mut forward: impl FnMut(LayoutItemType) -> ControlFlow<()>,
    ) {
        for item_type in self.item_types_before(start) {
            if backward(item_type).is_break() {
                break;
            }
        }
        for item_type in self.item_types_from(start) {
            if forward(item_type).is_break() {
                break;
            }
        }
    }

    /// In-range item types preceding `start`, nearest first.
    pub fn item_types_before(
        &self,
        start: LayoutItemType,
    ) -> impl Iterator<Item = LayoutItemType> + '_ {
        iter::successors(self.previous_item_type(start), move |item_type| {
            self.previous_item_type(*item_type)
        })
        .take_while(move |item_type| self.is_in_range(item_type))
    }

    /// `start` (if in range) followed by every in-range item type after it.
    pub fn item_types_from(
        &self,
        start: LayoutItemType,
    ) -> impl Iterator<Item = LayoutItemType> + '_ {
        iter::successors(Some(start), move |item_type| self.next_item_type(*item_type))
            .take_while(move |item_type| self.is_in_range(item_type))
    }

    /// Whether the item type belongs to the laid-out months and days.
    pub fn is_in_range(&self, item_type: &LayoutItemType) -> bool {
        match item_type {
            LayoutItemType::MonthHeader { month } => self.month_range.contains(month),
            LayoutItemType::DayOfWeekInMonth { month, .. } => {
                !self.days_of_week_pinned && self.month_range.contains(month)
            }
            LayoutItemType::Day { day } => self.day_range.contains(day),
        }
    }

    /// Item immediately before `item_type`, ignoring range. `None` only when the
    /// calendar cannot represent it.
    pub fn previous_item_type(&self, item_type: LayoutItemType) -> Option<LayoutItemType> {
        match item_type {
            LayoutItemType::MonthHeader { month } => month
                .previous()
                .map(|previous| LayoutItemType::day(self.last_day_in_month(previous))),
            LayoutItemType::DayOfWeekInMonth { position, month } => {
                Some(if position == DayOfWeekPosition::First {
                    LayoutItemType::month_header(month)
                } else {
                    LayoutItemType::day_of_week_in_month(position.previous(), month)
                })
            }
            LayoutItemType::Day { day } => {
                if day == self.first_day_in_month(day.month()) {
                    Some(self.item_before_days_of(day.month()))
                } else {
                    day.previous().map(LayoutItemType::day)
                }
            }
        }
    }

    /// Item immediately after `item_type`, ignoring range. `None` only when the
    /// calendar cannot represent it.
    pub fn next_item_type(&self, item_type: LayoutItemType) -> Option<LayoutItemType> {
        match item_type {
            LayoutItemType::MonthHeader { month } => Some(if self.days_of_week_pinned {
                LayoutItemType::day(self.first_day_in_month(month))
            } else {
                LayoutItemType::day_of_week_in_month(DayOfWeekPosition::First, month)
            }),
            LayoutItemType::DayOfWeekInMonth { position, month } => {
                Some(if position == DayOfWeekPosition::Last {
                    LayoutItemType::day(self.first_day_in_month(month))
                } else {
                    LayoutItemType::day_of_week_in_month(position.next(), month)
                })
            }
            LayoutItemType::Day { day } => {
                if day == self.last_day_in_month(day.month()) {
                    day.month().next().map(LayoutItemType::month_header)
                } else {
                    day.next().map(LayoutItemType::day)
                }
            }
        }
    }

    /// First laid-out day of `month`, clamped to the day range lower bound.
    pub fn first_day_in_month(&self, month: Month) -> Day {
        Day::first_of(month).max(self.day_range.lower_bound())
    }

    /// Last laid-out day of `month`, clamped to the day range upper bound.
    pub fn last_day_in_month(&self, month: Month) -> Day {
        Day::last_of(month).min(self.day_range.upper_bound())
    }

    fn item_before_days_of(&self, month: Month) -> LayoutItemType {
        if self.days_of_week_pinned {
            LayoutItemType::month_header(month)
        } else {
            LayoutItemType::day_of_week_in_month(DayOfWeekPosition::Last, month)
        }
    }
}
