//! Programmatic scroll positions and targets

use serde::Serialize;

use super::layout_item::LayoutItemType;
use crate::model::{Day, Month};

/// Where a scrolled-to item comes to rest in the viewport.
///
/// # Resolution
/// Only the scroll-axis coordinate of the item's frame is changed; see
/// `FrameProvider::frame_of_item`. The resolved frame may be over-scrolled past
/// the content boundaries. Boundary correction then pulls it back, so a request
/// for a position the content cannot reach rests as close to it as possible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "position", rename_all = "snake_case")]
pub enum CalendarScrollPosition {
    /// Item centered along the scroll axis.
    #[default]
    Centered,

    /// Item's leading edge `padding` points past the viewport's leading margin
    /// (and below any pinned weekday row).
    FirstFullyVisiblePosition {
        /// Gap left before the item, in points.
        padding: f64,
    },

    /// Item's trailing edge `padding` points before the viewport's trailing margin.
    LastFullyVisiblePosition {
        /// Gap left after the item, in points.
        padding: f64,
    },
}

/// What a programmatic scroll aims at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ScrollTarget {
    /// A whole month, anchored on its header.
    Month {
        /// Month to show.
        month: Month,
    },
    /// A single day.
    Day {
        /// Day to show.
        day: Day,
    },
}

impl ScrollTarget {
    /// Layout item used as the anchor when scrolling to this target.
    pub fn layout_item_type(&self) -> LayoutItemType {
        match self {
            Self::Month { month } => LayoutItemType::month_header(*month),
            Self::Day { day } => LayoutItemType::day(*day),
        }
    }
}

/// A pending programmatic scroll, consumed by the next layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollToItemContext {
    /// Item to scroll to.
    pub target: ScrollTarget,
    /// Where it should rest.
    pub position: CalendarScrollPosition,
}
