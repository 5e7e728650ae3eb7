//! Page geometry for paginated horizontal layouts.

use super::content::{MonthsLayout, PageRestingPosition, ScrollingBehavior};
use super::frame_provider::FrameProvider;

/// A grid of resting offsets, `page_size` apart, with page 0 at `page_origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    page_size: f64,
    page_origin: f64,
}

impl Pagination {
    /// # Panics
    /// If `page_size` is not positive.
    pub fn new(page_size: f64, page_origin: f64) -> Self {
        assert!(page_size > 0.0, "page size must be positive, got {page_size}");
        Self {
            page_size,
            page_origin,
        }
    }

    /// Pagination for the frame provider's layout, or `None` when scrolling is free.
    pub fn for_layout(frame_provider: &FrameProvider, page_origin: f64) -> Option<Self> {
        let MonthsLayout::Horizontal(options) = frame_provider.content().months_layout() else {
            return None;
        };
        let ScrollingBehavior::Paginated(resting_position) = options.scrolling_behavior else {
            return None;
        };
        let page_size = match resting_position {
            PageRestingPosition::AtLeadingEdgeOfEachMonth => {
                frame_provider.month_width() + frame_provider.content().inter_month_spacing()
            }
            PageRestingPosition::AtIncrementsOfCalendarWidth => frame_provider.size().width,
        };
        (page_size > 0.0).then(|| Self::new(page_size, page_origin))
    }

    /// Distance between resting offsets.
    pub fn page_size(&self) -> f64 {
        self.page_size
    }

    /// Offset of page 0.
    pub fn page_origin(&self) -> f64 {
        self.page_origin
    }

    /// Fractional page position of `offset`.
    fn position(&self, offset: f64) -> f64 {
        (offset - self.page_origin) / self.page_size
    }

    /// Page whose resting offset is nearest `offset`.
    pub fn closest_page_index(&self, offset: f64) -> i64 {
        self.position(offset).round() as i64
    }

    /// Resting offset of page `page_index`.
    pub fn offset_for_page(&self, page_index: i64) -> f64 {
        self.page_origin + page_index as f64 * self.page_size
    }

    /// Where a drag released at `offset` comes to rest.
    ///
    /// A forward fling settles on the next page boundary ahead, a backward fling
    /// on the one behind, and a release without velocity on the closest page.
    pub fn target_offset_for_drag_end(&self, offset: f64, velocity: f64) -> f64 {
        let position = self.position(offset);
        let page_index = if velocity > 0.0 {
            position.floor() as i64 + 1
        } else if velocity < 0.0 {
            position.ceil() as i64 - 1
        } else {
            position.round() as i64
        };
        self.offset_for_page(page_index)
    }
}
