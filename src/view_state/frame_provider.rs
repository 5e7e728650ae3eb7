//! Frame provider - closed-form geometry for every layout item.
//!
//! Pure mapping from (content, viewport size, layout margins, pixel scale) to
//! frames. Derived sizes are computed once at construction. Nothing here iterates
//! over months or days: every frame is O(1) from its month's origin, and month
//! origins are chained one neighbor at a time.
//!
//! # Numeric policy
//! All math is `f64` and unrounded. Callers snap with [`Rect::aligned`] when they
//! emit a frame, so chained month origins never accumulate rounding error.

use std::sync::Arc;

use super::content::{CalendarContent, MonthsLayout};
use super::layout_item::{LayoutItem, LayoutItemType};
use super::scroll::CalendarScrollPosition;
use super::types::{EdgeInsets, Point, Rect, ScrollAxis, Size};
use crate::model::{Day, DayOfWeekPosition, Month};

/// Computes frames for layout items from a fixed content snapshot and viewport.
#[derive(Debug, Clone)]
pub struct FrameProvider {
    content: Arc<CalendarContent>,
    size: Size,
    layout_margins: EdgeInsets,
    scale: f64,
    month_width: f64,
    day_size: Size,
    day_of_week_size: Size,
}

impl FrameProvider {
    /// Derive month width and cell sizes for `content` in a viewport of `size`.
    ///
    /// # Panics
    /// If `scale` is not a positive finite number.
    pub fn new(
        content: Arc<CalendarContent>,
        size: Size,
        layout_margins: EdgeInsets,
        scale: f64,
    ) -> Self {
        assert!(
            scale.is_finite() && scale > 0.0,
            "pixel scale must be positive and finite, got {scale}"
        );
        let available_width = size.width - layout_margins.leading - layout_margins.trailing;
        let month_width = match content.months_layout() {
            MonthsLayout::Vertical(_) => available_width,
            MonthsLayout::Horizontal(options) => {
                options.month_width(available_width, content.inter_month_spacing())
            }
        };

        let insets = content.month_day_insets();
        let inset_width = month_width - insets.leading - insets.trailing;
        let columns = DayOfWeekPosition::NUMBER_OF_POSITIONS as f64;
        let day_width =
            ((inset_width - content.horizontal_day_margin() * (columns - 1.0)) / columns).max(0.0);
        let day_size = Size::new(day_width, day_width * content.day_aspect_ratio());
        let day_of_week_size = Size::new(day_width, day_width * content.day_of_week_aspect_ratio());

        Self {
            content,
            size,
            layout_margins,
            scale,
            month_width,
            day_size,
            day_of_week_size,
        }
    }

    /// Content the frames are computed for.
    pub fn content(&self) -> &Arc<CalendarContent> {
        &self.content
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Viewport insets around the months.
    pub fn layout_margins(&self) -> EdgeInsets {
        self.layout_margins
    }

    /// Display pixels per point.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Axis of the months layout.
    pub fn scroll_axis(&self) -> ScrollAxis {
        self.content.months_layout().scroll_axis()
    }

    /// Width of every month.
    pub fn month_width(&self) -> f64 {
        self.month_width
    }

    /// Size of every day cell.
    pub fn day_size(&self) -> Size {
        self.day_size
    }

    /// Size of every weekday cell. Same width as a day.
    pub fn day_of_week_size(&self) -> Size {
        self.day_of_week_size
    }

    /// Snap a frame to the display's pixel grid.
    pub fn aligned(&self, frame: Rect) -> Rect {
        frame.aligned(self.scale)
    }

    fn pins_days_of_week(&self) -> bool {
        self.content.months_layout().pins_days_of_week_to_top()
    }

    /// Height of the per-month weekday row including its trailing margin (0 when pinned).
    fn days_of_week_row_height(&self) -> f64 {
        if self.pins_days_of_week() {
            0.0
        } else {
            self.day_of_week_size.height + self.content.vertical_day_margin()
        }
    }

    /// Height of content pinned at the top of the viewport.
    pub fn height_of_pinned_content(&self) -> f64 {
        if !self.pins_days_of_week() {
            return 0.0;
        }
        let separator = self
            .content
            .days_of_week_row_separator()
            .map_or(0.0, |options| options.height);
        self.day_of_week_size.height + separator
    }

    /// Origin for a month placed at the top-leading corner of a viewport at
    /// `offset`, below any pinned content.
    pub fn default_month_origin(&self, offset: Point) -> Point {
        Point::new(
            offset.x + self.layout_margins.leading,
            offset.y + self.layout_margins.top + self.height_of_pinned_content(),
        )
    }

    /// Week row of `day`, counted from the first laid-out row of its month.
    ///
    /// In a partial first month, rows before the first laid-out day are dropped.
    pub fn adjusted_row_in_month(&self, day: Day) -> u32 {
        let calendar = self.content.calendar();
        let row = calendar.row_in_month(day.date());
        let lower = self.content.day_range().lower_bound();
        if day.month() == lower.month() {
            row.saturating_sub(calendar.row_in_month(lower.date()))
        } else {
            row
        }
    }

    /// Number of week rows `month` occupies.
    pub fn number_of_week_rows(&self, month: Month) -> u32 {
        let last_day = Day::last_of(month).min(self.content.day_range().upper_bound());
        self.adjusted_row_in_month(last_day) + 1
    }

    /// Full height of `month`: header, insets, weekday row and week rows.
    pub fn height_of_month(&self, month: Month) -> f64 {
        let insets = self.content.month_day_insets();
        let rows = f64::from(self.number_of_week_rows(month));
        self.content.month_header_height(month)
            + insets.top
            + self.days_of_week_row_height()
            + rows * self.day_size.height
            + (rows - 1.0) * self.content.vertical_day_margin()
            + insets.bottom
    }

    /// Frame enclosing the header, weekday row and days of `month`.
    pub fn frame_of_month(&self, month: Month, month_origin: Point) -> Rect {
        Rect::from_origin_size(
            month_origin,
            Size::new(self.month_width, self.height_of_month(month)),
        )
    }

    /// Header frame; the header sits at the month origin.
    pub fn frame_of_month_header(&self, month: Month, month_origin: Point) -> Rect {
        Rect::new(
            month_origin.x,
            month_origin.y,
            self.month_width,
            self.content.month_header_height(month),
        )
    }

    /// Weekday cell in column `position` of the row under the header.
    pub fn frame_of_day_of_week(
        &self,
        position: DayOfWeekPosition,
        month: Month,
        month_origin: Point,
    ) -> Rect {
        let insets = self.content.month_day_insets();
        let x = month_origin.x
            + insets.leading
            + (self.day_of_week_size.width + self.content.horizontal_day_margin())
                * position.index() as f64;
        let y = month_origin.y + self.content.month_header_height(month) + insets.top;
        Rect::from_origin_size(Point::new(x, y), self.day_of_week_size)
    }

    /// Frame of `day` computed from its row and column in the month grid.
    pub fn frame_of_day(&self, day: Day, month_origin: Point) -> Rect {
        let insets = self.content.month_day_insets();
        let position = self.content.calendar().day_of_week_position(day.date());
        let row = f64::from(self.adjusted_row_in_month(day));
        let x = month_origin.x
            + insets.leading
            + (self.day_size.width + self.content.horizontal_day_margin()) * position.index() as f64;
        let y = month_origin.y
            + self.content.month_header_height(day.month())
            + insets.top
            + self.days_of_week_row_height()
            + (self.day_size.height + self.content.vertical_day_margin()) * row;
        Rect::from_origin_size(Point::new(x, y), self.day_size)
    }

    /// Frame of `day` derived from the frame of a neighboring day in the same month.
    ///
    /// # Panics
    /// If the days are in different months or not exactly one day apart.
    pub fn frame_of_day_adjacent_to(
        &self,
        day: Day,
        adjacent_day: Day,
        adjacent_frame: Rect,
        month_origin: Point,
    ) -> Rect {
        assert_eq!(
            day.month(),
            adjacent_day.month(),
            "adjacent day frame requested across months: {day} from {adjacent_day}"
        );
        let distance = i64::from(day.day()) - i64::from(adjacent_day.day());
        assert!(
            distance.abs() == 1,
            "adjacent day frame requested for non-adjacent days: {day} from {adjacent_day}"
        );

        let insets = self.content.month_day_insets();
        let step_x = self.day_size.width + self.content.horizontal_day_margin();
        let step_y = self.day_size.height + self.content.vertical_day_margin();
        let position = self.content.calendar().day_of_week_position(day.date());
        let row_start_x = month_origin.x + insets.leading;

        let origin = if distance == 1 {
            if position == DayOfWeekPosition::First {
                Point::new(row_start_x, adjacent_frame.y + step_y)
            } else {
                Point::new(adjacent_frame.x + step_x, adjacent_frame.y)
            }
        } else if position == DayOfWeekPosition::Last {
            Point::new(
                row_start_x + step_x * DayOfWeekPosition::Last.index() as f64,
                adjacent_frame.y - step_y,
            )
        } else {
            Point::new(adjacent_frame.x - step_x, adjacent_frame.y)
        };
        Rect::from_origin_size(origin, self.day_size)
    }

    /// Origin of the month containing `item`, derived from the item's frame.
    pub fn origin_of_month_containing(&self, item: &LayoutItem) -> Point {
        let insets = self.content.month_day_insets();
        let frame = item.frame;
        match item.item_type {
            LayoutItemType::MonthHeader { .. } => frame.origin(),
            LayoutItemType::DayOfWeekInMonth { position, month } => Point::new(
                frame.x
                    - insets.leading
                    - (self.day_of_week_size.width + self.content.horizontal_day_margin())
                        * position.index() as f64,
                frame.y - insets.top - self.content.month_header_height(month),
            ),
            LayoutItemType::Day { day } => {
                let position = self.content.calendar().day_of_week_position(day.date());
                let row = f64::from(self.adjusted_row_in_month(day));
                Point::new(
                    frame.x
                        - insets.leading
                        - (self.day_size.width + self.content.horizontal_day_margin())
                            * position.index() as f64,
                    frame.y
                        - self.content.month_header_height(day.month())
                        - insets.top
                        - self.days_of_week_row_height()
                        - (self.day_size.height + self.content.vertical_day_margin()) * row,
                )
            }
        }
    }

    /// Origin of `month` given the origin of the month after it.
    pub fn origin_of_month_before(&self, month: Month, following_month_origin: Point) -> Point {
        match self.content.months_layout() {
            MonthsLayout::Vertical(_) => Point::new(
                following_month_origin.x,
                following_month_origin.y
                    - self.content.inter_month_spacing()
                    - self.height_of_month(month),
            ),
            MonthsLayout::Horizontal(_) => {
                let following = month
                    .next()
                    .unwrap_or_else(|| panic!("month after {month} has an origin but no value"));
                Point::new(
                    following_month_origin.x
                        - self.content.inter_month_spacing()
                        - self.month_width,
                    following_month_origin.y + self.content.month_header_height(following)
                        - self.content.month_header_height(month),
                )
            }
        }
    }

    /// Origin of `month` given the origin of the month before it.
    pub fn origin_of_month_after(&self, month: Month, preceding_month_origin: Point) -> Point {
        let preceding = month
            .previous()
            .unwrap_or_else(|| panic!("month before {month} has an origin but no value"));
        match self.content.months_layout() {
            MonthsLayout::Vertical(_) => Point::new(
                preceding_month_origin.x,
                preceding_month_origin.y
                    + self.height_of_month(preceding)
                    + self.content.inter_month_spacing(),
            ),
            MonthsLayout::Horizontal(_) => Point::new(
                preceding_month_origin.x + self.month_width + self.content.inter_month_spacing(),
                preceding_month_origin.y + self.content.month_header_height(preceding)
                    - self.content.month_header_height(month),
            ),
        }
    }

    /// Where `original_frame` lands when scrolled to `position` in a viewport at `offset`.
    ///
    /// Only the scroll-axis coordinate changes. The result may be over-scrolled;
    /// boundary correction happens in the visible items provider.
    pub fn frame_of_item(
        &self,
        original_frame: Rect,
        position: CalendarScrollPosition,
        offset: Point,
    ) -> Rect {
        let mut frame = original_frame;
        match self.scroll_axis() {
            ScrollAxis::Vertical => {
                frame.y = match position {
                    CalendarScrollPosition::Centered => {
                        offset.y + self.size.height / 2.0 - frame.height / 2.0
                    }
                    CalendarScrollPosition::FirstFullyVisiblePosition { padding } => {
                        offset.y + self.layout_margins.top + self.height_of_pinned_content() + padding
                    }
                    CalendarScrollPosition::LastFullyVisiblePosition { padding } => {
                        offset.y + self.size.height
                            - self.layout_margins.bottom
                            - frame.height
                            - padding
                    }
                };
            }
            ScrollAxis::Horizontal => {
                frame.x = match position {
                    CalendarScrollPosition::Centered => {
                        offset.x + self.size.width / 2.0 - frame.width / 2.0
                    }
                    CalendarScrollPosition::FirstFullyVisiblePosition { padding } => {
                        offset.x + self.layout_margins.leading + padding
                    }
                    CalendarScrollPosition::LastFullyVisiblePosition { padding } => {
                        offset.x + self.size.width
                            - self.layout_margins.trailing
                            - frame.width
                            - padding
                    }
                };
            }
        }
        frame
    }

    /// Scroll-axis coordinate where content starts, given the first month's origin.
    pub fn content_start_boundary(&self, first_month_origin: Point) -> f64 {
        self.scroll_axis().component(first_month_origin)
    }

    /// Scroll-axis coordinate where content ends, given the last month's origin.
    pub fn content_end_boundary(&self, last_month: Month, last_month_origin: Point) -> f64 {
        match self.scroll_axis() {
            ScrollAxis::Vertical => last_month_origin.y + self.height_of_month(last_month),
            ScrollAxis::Horizontal => last_month_origin.x + self.month_width,
        }
    }

    /// Smallest offset that does not reveal space before the content start.
    pub fn minimum_scroll_offset(&self, content_start_boundary: f64) -> f64 {
        match self.scroll_axis() {
            ScrollAxis::Vertical => {
                content_start_boundary - self.layout_margins.top - self.height_of_pinned_content()
            }
            ScrollAxis::Horizontal => content_start_boundary - self.layout_margins.leading,
        }
    }

    /// Largest offset that does not reveal space after the content end.
    pub fn maximum_scroll_offset(&self, content_end_boundary: f64) -> f64 {
        match self.scroll_axis() {
            ScrollAxis::Vertical => {
                content_end_boundary + self.layout_margins.bottom - self.size.height
            }
            ScrollAxis::Horizontal => {
                content_end_boundary + self.layout_margins.trailing - self.size.width
            }
        }
    }

    /// Weekday cell in the pinned row at the top of the viewport.
    pub fn frame_of_pinned_day_of_week(
        &self,
        position: DayOfWeekPosition,
        bounds_origin: Point,
    ) -> Rect {
        let insets = self.content.month_day_insets();
        let x = bounds_origin.x
            + self.layout_margins.leading
            + insets.leading
            + (self.day_of_week_size.width + self.content.horizontal_day_margin())
                * position.index() as f64;
        Rect::from_origin_size(Point::new(x, bounds_origin.y), self.day_of_week_size)
    }

    /// Full-width backdrop of the pinned weekday row.
    pub fn frame_of_pinned_days_of_week_row_background(&self, bounds_origin: Point) -> Rect {
        Rect::new(
            bounds_origin.x,
            bounds_origin.y,
            self.size.width,
            self.day_of_week_size.height,
        )
    }

    /// Separator just below the pinned weekday row.
    pub fn frame_of_pinned_days_of_week_row_separator(
        &self,
        bounds_origin: Point,
        separator_height: f64,
    ) -> Rect {
        Rect::new(
            bounds_origin.x,
            bounds_origin.y + self.day_of_week_size.height,
            self.size.width,
            separator_height,
        )
    }

    /// Separator along the bottom of a month's weekday row.
    pub fn frame_of_days_of_week_row_separator(
        &self,
        month: Month,
        month_origin: Point,
        separator_height: f64,
    ) -> Rect {
        let row = self.frame_of_day_of_week(DayOfWeekPosition::First, month, month_origin);
        Rect::new(month_origin.x, row.max_y(), self.month_width, separator_height)
    }
}

#[cfg(test)]
#[path = "frame_provider_tests.rs"]
mod tests;
