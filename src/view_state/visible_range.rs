//! Result of a visible items computation

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::layout_item::LayoutItem;
use super::types::Rect;
use super::visible_item::VisibleItem;
use crate::model::{Day, DayRange, Month, MonthRange};

/// Everything one layout pass learned about the viewport.
///
/// # Invariants
/// - Every item in `visible_items` intersects the viewport bounds.
/// - `minimum_scroll_offset <= maximum_scroll_offset` when both are known.
/// - A content boundary is `Some` only if the walk reached the first (or last)
///   laid-out month; otherwise the content is treated as boundless on that side.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleItemsDetails {
    /// Items to render, unordered. Use [`sorted_for_rendering`](Self::sorted_for_rendering)
    /// for z-order.
    pub visible_items: HashSet<VisibleItem>,
    /// Layout item whose center is closest to the viewport center. Becomes the
    /// next pass's anchor.
    pub centermost_layout_item: LayoutItem,
    /// First through last day visible outside the pinned region.
    pub visible_day_range: Option<DayRange>,
    /// First through last month visible outside the pinned region.
    pub visible_month_range: Option<MonthRange>,
    /// Aligned frame of every visible month.
    pub frames_for_visible_months: BTreeMap<Month, Rect>,
    /// Aligned frame of every visible day.
    pub frames_for_visible_days: BTreeMap<Day, Rect>,
    /// Scroll-axis coordinate of the content start, if reached.
    pub content_start_boundary: Option<f64>,
    /// Scroll-axis coordinate of the content end, if reached.
    pub content_end_boundary: Option<f64>,
    /// Smallest offset that keeps the viewport on content, once the start is reached.
    pub minimum_scroll_offset: Option<f64>,
    /// Largest offset that keeps the viewport on content, once the end is reached.
    pub maximum_scroll_offset: Option<f64>,
    /// Height of the pinned weekday row and its separator.
    pub height_of_pinned_content: f64,
    /// Tallest month visited (horizontal layouts size their height to it).
    pub max_month_height: f64,
}

impl VisibleItemsDetails {
    /// Visible items back-to-front.
    pub fn sorted_for_rendering(&self) -> Vec<&VisibleItem> {
        let mut items: Vec<_> = self.visible_items.iter().collect();
        items.sort_by_key(|item| item.item_type());
        items
    }

    /// Content is boundless on a side until the walk reaches that side's boundary.
    pub fn is_boundless_at_start(&self) -> bool {
        self.minimum_scroll_offset.is_none()
    }

    /// See [`is_boundless_at_start`](Self::is_boundless_at_start).
    pub fn is_boundless_at_end(&self) -> bool {
        self.maximum_scroll_offset.is_none()
    }
}
