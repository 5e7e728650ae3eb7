//! Headless calendar controller.
//!
//! `CalendarView` ties the layout engine together the way a host scroll view
//! would drive it: the host reports scrolling and viewport changes, then calls
//! [`CalendarView::layout`] and renders the returned view assignments.

use std::sync::Arc;

use tracing::debug;

use crate::model::{Day, DayRange, Month, MonthRange, ScrollError};
use crate::view_state::{
    CalendarContent, CalendarScrollPosition, EdgeInsets, ItemViewReuseManager, LayoutItem,
    LayoutItemType, Pagination, Point, ScrollAxis, ScrollMetrics, ScrollMetricsMutator,
    ScrollTarget, ScrollToItemContext, Size, ViewAssignment, ViewFactory, VisibleItemsDetails,
    VisibleItemsProvider,
};

/// Output of one [`CalendarView::layout`] call.
#[derive(Debug, Clone)]
pub struct CalendarLayout<V> {
    /// Everything the pass found visible.
    pub details: VisibleItemsDetails,
    /// Views for every visible item, back-to-front.
    pub assignments: Vec<ViewAssignment<V>>,
}

/// A calendar bound to a viewport and a view factory.
pub struct CalendarView<F: ViewFactory> {
    content: Arc<CalendarContent>,
    layout_margins: EdgeInsets,
    scale: f64,
    visible_items_provider: VisibleItemsProvider,
    scroll_metrics: ScrollMetricsMutator<ScrollMetrics>,
    reuse_manager: ItemViewReuseManager<F>,
    anchor: Option<LayoutItem>,
    scroll_to_item_context: Option<ScrollToItemContext>,
    /// Scroll offset of page 0 for paginated layouts.
    page_origin: Option<f64>,
    last_details: Option<VisibleItemsDetails>,
}

impl<F: ViewFactory> CalendarView<F> {
    /// Calendar with no layout margins at a pixel scale of 1.
    pub fn new(content: CalendarContent, size: Size, factory: F) -> Self {
        let content = Arc::new(content);
        let axis = content.months_layout().scroll_axis();
        let layout_margins = EdgeInsets::ZERO;
        let scale = 1.0;
        Self {
            visible_items_provider: VisibleItemsProvider::new(
                Arc::clone(&content),
                size,
                layout_margins,
                scale,
            ),
            scroll_metrics: ScrollMetricsMutator::new(
                ScrollMetrics::default(),
                axis,
                axis.length(size),
            ),
            content,
            layout_margins,
            scale,
            reuse_manager: ItemViewReuseManager::new(factory),
            anchor: None,
            scroll_to_item_context: None,
            page_origin: None,
            last_details: None,
        }
    }

    /// Content snapshot in use.
    pub fn content(&self) -> &Arc<CalendarContent> {
        &self.content
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        self.visible_items_provider.size()
    }

    /// Insets applied before laying out months.
    pub fn layout_margins(&self) -> EdgeInsets {
        self.layout_margins
    }

    /// Display pixels per point.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Axis the months layout scrolls along.
    pub fn scroll_axis(&self) -> ScrollAxis {
        self.content.months_layout().scroll_axis()
    }

    /// Offset and content boundaries along the scroll axis.
    pub fn scroll_metrics(&self) -> &ScrollMetricsMutator<ScrollMetrics> {
        &self.scroll_metrics
    }

    /// View pool and the factory that fills it.
    pub fn reuse_manager(&self) -> &ItemViewReuseManager<F> {
        &self.reuse_manager
    }

    /// Mutable access, e.g. to toggle view reuse.
    pub fn reuse_manager_mut(&mut self) -> &mut ItemViewReuseManager<F> {
        &mut self.reuse_manager
    }

    /// Anchor for the next pass: the centermost item of the last one.
    pub fn anchor(&self) -> Option<LayoutItem> {
        self.anchor
    }

    /// Details from the most recent layout pass.
    pub fn last_details(&self) -> Option<&VisibleItemsDetails> {
        self.last_details.as_ref()
    }

    /// Months visible after the last pass.
    pub fn visible_month_range(&self) -> Option<MonthRange> {
        self.last_details.as_ref()?.visible_month_range
    }

    /// Days visible after the last pass.
    pub fn visible_day_range(&self) -> Option<DayRange> {
        self.last_details.as_ref()?.visible_day_range
    }

    /// Current scroll offset as a point; the cross axis is always 0.
    pub fn offset(&self) -> Point {
        let offset = self.scroll_metrics.offset();
        match self.scroll_axis() {
            ScrollAxis::Vertical => Point::new(0.0, offset),
            ScrollAxis::Horizontal => Point::new(offset, 0.0),
        }
    }

    /// Replace the content snapshot.
    ///
    /// The anchor month keeps its position along the scroll axis if it is
    /// still in range and the scroll axis is unchanged; otherwise the next pass
    /// starts at the first month.
    pub fn set_content(&mut self, content: CalendarContent) {
        let previous_axis = self.scroll_axis();
        let anchor_month_origin = self.anchor_month_origin();
        self.content = Arc::new(content);
        self.rebuild_visible_items_provider(self.size());

        let axis = self.scroll_axis();
        if axis != previous_axis {
            debug!(?axis, "scroll axis changed, resetting scroll position");
            self.scroll_metrics.set_axis(axis);
            self.scroll_metrics.set_viewport_length(axis.length(self.size()));
            self.anchor = None;
            self.page_origin = None;
        } else if let Some((month, _)) = anchor_month_origin {
            if self
                .visible_items_provider
                .enumerator()
                .is_in_range(&LayoutItemType::month_header(month))
            {
                self.reanchor(anchor_month_origin);
            } else {
                debug!(%month, "anchor month left the date range, resetting");
                self.anchor = None;
                self.page_origin = None;
            }
        }

        if let Some(context) = self.scroll_to_item_context {
            if !self.is_in_range(context.target) {
                self.scroll_to_item_context = None;
            }
        }
        self.last_details = None;
    }

    /// Resize the viewport or change its margins or pixel scale.
    ///
    /// The anchor month keeps its position along the scroll axis.
    ///
    /// # Panics
    /// If `scale` is not a positive finite number or `size` has a negative or
    /// non-finite dimension.
    pub fn set_viewport(&mut self, size: Size, layout_margins: EdgeInsets, scale: f64) {
        assert!(
            scale.is_finite() && scale > 0.0,
            "pixel scale must be positive and finite, got {scale}"
        );
        assert!(
            size.width.is_finite()
                && size.height.is_finite()
                && size.width >= 0.0
                && size.height >= 0.0,
            "viewport size must be non-negative and finite, got {size:?}"
        );
        let anchor_month_origin = self.anchor_month_origin();
        self.layout_margins = layout_margins;
        self.scale = scale;
        self.rebuild_visible_items_provider(size);
        self.scroll_metrics
            .set_viewport_length(self.scroll_axis().length(size));
        self.reanchor(anchor_month_origin);
    }

    fn rebuild_visible_items_provider(&mut self, size: Size) {
        self.visible_items_provider = VisibleItemsProvider::new(
            Arc::clone(&self.content),
            size,
            self.layout_margins,
            self.scale,
        );
    }

    /// Month of the anchor and that month's origin along the scroll axis,
    /// under the current geometry.
    fn anchor_month_origin(&self) -> Option<(Month, f64)> {
        let anchor = self.anchor?;
        let origin = self
            .visible_items_provider
            .frame_provider()
            .origin_of_month_containing(&anchor);
        Some((anchor.item_type.month(), self.scroll_axis().component(origin)))
    }

    /// Replace the anchor with its month's header, laid out by the current
    /// provider at the recorded scroll-axis origin.
    fn reanchor(&mut self, anchor_month_origin: Option<(Month, f64)>) {
        let offset = self.offset();
        self.anchor = anchor_month_origin.map(|(month, origin)| {
            self.visible_items_provider
                .month_header_item_at(month, origin, offset)
        });
    }

    /// Scroll by `delta` along the scroll axis, clamped to the known content
    /// boundaries. Returns the distance actually scrolled.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.scroll_metrics.set_up_initial_metrics_if_needed();
        let offset = self.scroll_metrics.offset();
        let applied = self.scroll_metrics.clamped(offset + delta) - offset;
        self.scroll_metrics.apply_offset(applied);
        applied
    }

    /// Request that the next pass place `month` at `position`.
    pub fn scroll_to_month(
        &mut self,
        month: Month,
        position: CalendarScrollPosition,
    ) -> Result<(), ScrollError> {
        self.scroll_to(ScrollTarget::Month { month }, position)
    }

    /// Request that the next pass place `day` at `position`.
    pub fn scroll_to_day(
        &mut self,
        day: Day,
        position: CalendarScrollPosition,
    ) -> Result<(), ScrollError> {
        self.scroll_to(ScrollTarget::Day { day }, position)
    }

    fn scroll_to(
        &mut self,
        target: ScrollTarget,
        position: CalendarScrollPosition,
    ) -> Result<(), ScrollError> {
        if !self.is_in_range(target) {
            return Err(ScrollError::TargetOutOfRange {
                target: target.layout_item_type().to_string(),
            });
        }
        debug!(target = %target.layout_item_type(), ?position, "scroll to item requested");
        self.scroll_to_item_context = Some(ScrollToItemContext { target, position });
        Ok(())
    }

    fn is_in_range(&self, target: ScrollTarget) -> bool {
        self.visible_items_provider
            .enumerator()
            .is_in_range(&target.layout_item_type())
    }

    /// Resting offset for a drag released at the current offset, or `None` when
    /// the layout is not paginated.
    pub fn target_offset_for_drag_end(&self, velocity: f64) -> Option<f64> {
        let offset = self.scroll_metrics.offset();
        let page_origin = self.page_origin.unwrap_or(offset);
        let pagination =
            Pagination::for_layout(self.visible_items_provider.frame_provider(), page_origin)?;
        let target = pagination.target_offset_for_drag_end(offset, velocity);
        Some(self.scroll_metrics.clamped(target))
    }

    /// Run one layout pass at the current offset.
    pub fn layout(&mut self) -> CalendarLayout<F::View> {
        self.scroll_metrics.set_up_initial_metrics_if_needed();

        if let Some(anchor) = self.anchor {
            let before = self.scroll_metrics.offset();
            self.anchor = Some(self.scroll_metrics.loop_offset_if_needed(anchor));
            let delta = self.scroll_metrics.offset() - before;
            if delta != 0.0 {
                self.page_origin = self.page_origin.map(|origin| origin + delta);
            }
        }

        let offset = self.offset();
        let provider = &mut self.visible_items_provider;
        let anchor = match (self.scroll_to_item_context.take(), self.anchor) {
            (Some(context), _) => provider.anchor_item(context.target, context.position, offset),
            (None, Some(anchor)) => provider.boundary_corrected(anchor, offset),
            (None, None) => {
                provider.boundary_corrected(provider.initial_anchor_item(offset), offset)
            }
        };

        let details = provider.details_for_visible_items(anchor, offset);
        self.scroll_metrics
            .update_scroll_boundaries(details.minimum_scroll_offset, details.maximum_scroll_offset);
        self.anchor = Some(details.centermost_layout_item);
        self.page_origin = details
            .minimum_scroll_offset
            .or(self.page_origin)
            .or(Some(self.scroll_axis().component(offset)));

        let assignments = self
            .reuse_manager
            .assign_views(details.visible_items.iter().cloned());
        self.last_details = Some(details.clone());
        CalendarLayout {
            details,
            assignments,
        }
    }
}

impl<F: ViewFactory + std::fmt::Debug> std::fmt::Debug for CalendarView<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarView")
            .field("size", &self.size())
            .field("layout_margins", &self.layout_margins)
            .field("scale", &self.scale)
            .field("offset", &self.scroll_metrics.offset())
            .field("anchor", &self.anchor)
            .field("reuse_manager", &self.reuse_manager)
            .finish()
    }
}

#[cfg(test)]
#[path = "calendar_view_tests.rs"]
mod tests;
