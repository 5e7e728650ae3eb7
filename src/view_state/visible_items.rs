//! Visible items provider - the per-pass layout orchestrator.
//!
//! Given an anchor (a layout item whose frame is known from the previous pass)
//! and the viewport offset, walks item types outward from the anchor, chains
//! month origins one month at a time, and collects everything that intersects
//! the viewport. Work per pass is proportional to what is on screen, never to
//! the size of the date range.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, trace};

use super::content::{CalendarContent, ItemProviders};
use super::enumerator::LayoutItemTypeEnumerator;
use super::frame_provider::FrameProvider;
use super::item_model::{
    DayRangeLayoutContext, DefaultModels, ItemModel, OverlaidItemLocation, OverlayLayoutContext,
};
use super::layout_item::{LayoutItem, LayoutItemType};
use super::model_cache::ItemModelCache;
use super::scroll::{CalendarScrollPosition, ScrollTarget};
use super::types::{EdgeInsets, Point, Rect, ScrollAxis, Size};
use super::visible_item::{VisibleItem, VisibleItemType};
use super::visible_range::VisibleItemsDetails;
use crate::model::{Day, DayOfWeekPosition, DayRange, Month, MonthRange};

/// Corrections smaller than this are treated as already stable.
const BOUNDARY_CORRECTION_TOLERANCE: f64 = 1e-6;

/// Each correction can reveal at most one new boundary, so three passes always settle.
const MAX_BOUNDARY_CORRECTION_PASSES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkDirection {
    Backward,
    Forward,
}

/// Produces [`VisibleItemsDetails`] for a fixed content snapshot and viewport size.
///
/// Owns the item model cache, so models survive from one pass to the next.
/// Rebuild the provider when the content or viewport size changes.
#[derive(Debug)]
pub struct VisibleItemsProvider {
    content: Arc<CalendarContent>,
    frame_provider: FrameProvider,
    enumerator: LayoutItemTypeEnumerator,
    model_cache: ItemModelCache,
}

impl VisibleItemsProvider {
    /// Provider for `content` in a viewport of `size`.
    pub fn new(
        content: Arc<CalendarContent>,
        size: Size,
        layout_margins: EdgeInsets,
        scale: f64,
    ) -> Self {
        let enumerator = LayoutItemTypeEnumerator::new(
            content.month_range(),
            content.day_range(),
            content.months_layout().pins_days_of_week_to_top(),
        );
        let frame_provider = FrameProvider::new(Arc::clone(&content), size, layout_margins, scale);
        Self {
            content,
            frame_provider,
            enumerator,
            model_cache: ItemModelCache::new(),
        }
    }

    /// Content being laid out.
    pub fn content(&self) -> &Arc<CalendarContent> {
        &self.content
    }

    /// Frame math for this content and viewport.
    pub fn frame_provider(&self) -> &FrameProvider {
        &self.frame_provider
    }

    /// Walks layout item types in order within the content range.
    pub fn enumerator(&self) -> &LayoutItemTypeEnumerator {
        &self.enumerator
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        self.frame_provider.size()
    }

    /// Axis of the months layout.
    pub fn scroll_axis(&self) -> ScrollAxis {
        self.frame_provider.scroll_axis()
    }

    /// Header of the first month, flush with the start of a viewport at `offset`.
    pub fn initial_anchor_item(&self, offset: Point) -> LayoutItem {
        let month = self.content.month_range().lower_bound();
        let origin = self.frame_provider.default_month_origin(offset);
        LayoutItem::new(
            LayoutItemType::month_header(month),
            self.frame_provider.frame_of_month_header(month, origin),
        )
    }

    /// Header of `month` with the month's origin at `month_origin` along the
    /// scroll axis. The cross-axis position follows this provider's geometry.
    pub fn month_header_item_at(
        &self,
        month: Month,
        month_origin: f64,
        offset: Point,
    ) -> LayoutItem {
        let default_origin = self.frame_provider.default_month_origin(offset);
        let origin = match self.scroll_axis() {
            ScrollAxis::Vertical => Point::new(default_origin.x, month_origin),
            ScrollAxis::Horizontal => Point::new(month_origin, default_origin.y),
        };
        LayoutItem::new(
            LayoutItemType::month_header(month),
            self.frame_provider.frame_of_month_header(month, origin),
        )
    }

    /// Anchor for a programmatic scroll, boundary-corrected.
    pub fn anchor_item(
        &self,
        target: ScrollTarget,
        position: CalendarScrollPosition,
        offset: Point,
    ) -> LayoutItem {
        match target {
            ScrollTarget::Month { month } => self.anchor_month_header_item(month, position, offset),
            ScrollTarget::Day { day } => self.anchor_day_item(day, position, offset),
        }
    }

    /// Header of `month`, placed so the whole month rests at `position`.
    pub fn anchor_month_header_item(
        &self,
        month: Month,
        position: CalendarScrollPosition,
        offset: Point,
    ) -> LayoutItem {
        let base_origin = self.frame_provider.default_month_origin(offset);
        let month_frame = self.frame_provider.frame_of_month(month, base_origin);
        let positioned = self
            .frame_provider
            .frame_of_item(month_frame, position, offset);
        let item = LayoutItem::new(
            LayoutItemType::month_header(month),
            self.frame_provider
                .frame_of_month_header(month, positioned.origin()),
        );
        self.boundary_corrected(item, offset)
    }

    /// `day`, placed at `position`.
    pub fn anchor_day_item(
        &self,
        day: Day,
        position: CalendarScrollPosition,
        offset: Point,
    ) -> LayoutItem {
        let base_origin = self.frame_provider.default_month_origin(offset);
        let day_frame = self.frame_provider.frame_of_day(day, base_origin);
        let item = LayoutItem::new(
            LayoutItemType::day(day),
            self.frame_provider
                .frame_of_item(day_frame, position, offset),
        );
        self.boundary_corrected(item, offset)
    }

    /// Shift `item` along the scroll axis so a viewport at `offset` shows no
    /// space before the content start or after the content end.
    ///
    /// When the content is shorter than the viewport, the start boundary wins.
    /// Applying this to an already-corrected item returns it unchanged.
    pub fn boundary_corrected(&self, item: LayoutItem, offset: Point) -> LayoutItem {
        let axis = self.scroll_axis();
        let current = axis.component(offset);
        let mut item = item;
        for _ in 0..MAX_BOUNDARY_CORRECTION_PASSES {
            let (minimum, maximum) = self.scroll_offset_limits_near(&item, offset);
            let mut corrected = current;
            if let Some(maximum) = maximum {
                corrected = corrected.min(maximum);
            }
            if let Some(minimum) = minimum {
                corrected = corrected.max(minimum);
            }
            let delta = current - corrected;
            if delta.abs() < BOUNDARY_CORRECTION_TOLERANCE {
                break;
            }
            trace!(item = %item.item_type, delta, "boundary correction");
            item.frame = axis.offset(&item.frame, delta);
        }
        item
    }

    /// Scroll offset limits implied by `item`'s placement, for the boundaries
    /// reachable from the viewport.
    ///
    /// Walks months outward from the item's month and stops at the first month
    /// that already covers the viewport edge, so the step count is bounded by the
    /// number of months on screen.
    fn scroll_offset_limits_near(
        &self,
        item: &LayoutItem,
        offset: Point,
    ) -> (Option<f64>, Option<f64>) {
        let axis = self.scroll_axis();
        let viewport_start = axis.component(offset);
        let viewport_end = viewport_start + axis.length(self.size());
        let month_range = self.content.month_range();
        let anchor_month = item.item_type.month();
        let anchor_origin = self.frame_provider.origin_of_month_containing(item);

        let mut month = anchor_month;
        let mut origin = anchor_origin;
        let minimum = loop {
            if month == month_range.lower_bound() {
                let start = self.frame_provider.content_start_boundary(origin);
                break Some(self.frame_provider.minimum_scroll_offset(start));
            }
            if axis.component(origin) <= viewport_start {
                break None;
            }
            let Some(previous) = month.previous() else {
                break None;
            };
            origin = self.frame_provider.origin_of_month_before(previous, origin);
            month = previous;
        };

        let mut month = anchor_month;
        let mut origin = anchor_origin;
        let maximum = loop {
            let end = self.frame_provider.content_end_boundary(month, origin);
            if month == month_range.upper_bound() {
                break Some(self.frame_provider.maximum_scroll_offset(end));
            }
            if end >= viewport_end {
                break None;
            }
            let Some(next) = month.next() else {
                break None;
            };
            origin = self.frame_provider.origin_of_month_after(next, origin);
            month = next;
        };

        (minimum, maximum)
    }

    /// Compute everything visible in a viewport at `offset`, walking from `anchor`.
    ///
    /// # Panics
    /// If the anchor's item type is outside the content's ranges.
    pub fn details_for_visible_items(
        &mut self,
        anchor: LayoutItem,
        offset: Point,
    ) -> VisibleItemsDetails {
        assert!(
            self.enumerator.is_in_range(&anchor.item_type),
            "anchor {} is outside the laid-out range",
            anchor.item_type
        );

        let content = &*self.content;
        let frame_provider = &self.frame_provider;
        let enumerator = &self.enumerator;
        let mut pass = LayoutPass::new(
            content,
            frame_provider,
            &mut self.model_cache,
            anchor,
            offset,
        );

        pass.seed_previous_day(anchor);
        for item_type in enumerator.item_types_before(anchor.item_type) {
            if pass.visit(item_type, None, WalkDirection::Backward).is_break() {
                break;
            }
        }

        pass.previous_day = None;
        for item_type in enumerator.item_types_from(anchor.item_type) {
            let known_frame = (item_type == anchor.item_type).then_some(anchor.frame);
            if pass
                .visit(item_type, known_frame, WalkDirection::Forward)
                .is_break()
            {
                break;
            }
        }

        let details = pass.finish();
        self.model_cache.finish_pass();
        details
    }
}

/// Mutable state of a single layout pass.
struct LayoutPass<'a> {
    content: &'a CalendarContent,
    frame_provider: &'a FrameProvider,
    model_cache: &'a mut ItemModelCache,
    anchor: LayoutItem,
    bounds: Rect,
    extended_bounds: Rect,
    /// Bounds minus the pinned weekday row; visible ranges are tracked here.
    unobscured_bounds: Rect,
    month_origins: BTreeMap<Month, Point>,
    walked_day_frames: BTreeMap<Day, Rect>,
    previous_day: Option<(Day, Rect)>,
    visible_items: HashSet<VisibleItem>,
    centermost: Option<(f64, LayoutItem)>,
    visible_months: BTreeSet<Month>,
    first_visible_day: Option<Day>,
    last_visible_day: Option<Day>,
    first_visible_month: Option<Month>,
    last_visible_month: Option<Month>,
    frames_for_visible_days: BTreeMap<Day, Rect>,
    content_start_boundary: Option<f64>,
    content_end_boundary: Option<f64>,
}

impl<'a> LayoutPass<'a> {
    fn new(
        content: &'a CalendarContent,
        frame_provider: &'a FrameProvider,
        model_cache: &'a mut ItemModelCache,
        anchor: LayoutItem,
        offset: Point,
    ) -> Self {
        let bounds = Rect::from_origin_size(offset, frame_provider.size());
        let pinned_height = frame_provider.height_of_pinned_content();
        let unobscured_bounds = Rect::new(
            bounds.x,
            bounds.y + pinned_height,
            bounds.width,
            (bounds.height - pinned_height).max(0.0),
        );

        let mut month_origins = BTreeMap::new();
        month_origins.insert(
            anchor.item_type.month(),
            frame_provider.origin_of_month_containing(&anchor),
        );

        Self {
            content,
            frame_provider,
            model_cache,
            anchor,
            bounds,
            extended_bounds: bounds.union(&anchor.frame),
            unobscured_bounds,
            month_origins,
            walked_day_frames: BTreeMap::new(),
            previous_day: None,
            visible_items: HashSet::new(),
            centermost: None,
            visible_months: BTreeSet::new(),
            first_visible_day: None,
            last_visible_day: None,
            first_visible_month: None,
            last_visible_month: None,
            frames_for_visible_days: BTreeMap::new(),
            content_start_boundary: None,
            content_end_boundary: None,
        }
    }

    fn seed_previous_day(&mut self, anchor: LayoutItem) {
        self.previous_day = match anchor.item_type {
            LayoutItemType::Day { day } => Some((day, anchor.frame)),
            _ => None,
        };
    }

    /// Origin of `month`, chained from an adjacent month already resolved this pass.
    ///
    /// # Panics
    /// If neither neighbor has an origin yet; the walk always moves one month at a time.
    fn month_origin(&mut self, month: Month) -> Point {
        if let Some(origin) = self.month_origins.get(&month) {
            return *origin;
        }
        let following = month.next().and_then(|next| self.month_origins.get(&next));
        let preceding = month
            .previous()
            .and_then(|previous| self.month_origins.get(&previous));
        let origin = match (following, preceding) {
            (Some(following), _) => self.frame_provider.origin_of_month_before(month, *following),
            (None, Some(preceding)) => self.frame_provider.origin_of_month_after(month, *preceding),
            (None, None) => panic!("no adjacent month origin to chain {month} from"),
        };
        self.month_origins.insert(month, origin);
        origin
    }

    fn frame_of(&self, item_type: LayoutItemType, month_origin: Point) -> Rect {
        match item_type {
            LayoutItemType::MonthHeader { month } => {
                self.frame_provider.frame_of_month_header(month, month_origin)
            }
            LayoutItemType::DayOfWeekInMonth { position, month } => self
                .frame_provider
                .frame_of_day_of_week(position, month, month_origin),
            LayoutItemType::Day { day } => match self.previous_day {
                Some((adjacent, adjacent_frame))
                    if adjacent.month() == day.month() && adjacent.day().abs_diff(day.day()) == 1 =>
                {
                    self.frame_provider.frame_of_day_adjacent_to(
                        day,
                        adjacent,
                        adjacent_frame,
                        month_origin,
                    )
                }
                _ => self.frame_provider.frame_of_day(day, month_origin),
            },
        }
    }

    fn visit(
        &mut self,
        item_type: LayoutItemType,
        known_frame: Option<Rect>,
        direction: WalkDirection,
    ) -> ControlFlow<()> {
        let month_origin = self.month_origin(item_type.month());
        let frame = known_frame.unwrap_or_else(|| self.frame_of(item_type, month_origin));

        if let LayoutItemType::Day { day } = item_type {
            self.previous_day = Some((day, frame));
            self.walked_day_frames.insert(day, frame);
        }
        self.record_content_boundaries(item_type, month_origin);

        if self.is_beyond_extended_bounds(item_type, frame, month_origin, direction) {
            return ControlFlow::Break(());
        }
        if frame.intersects(&self.bounds) {
            self.materialize(LayoutItem::new(item_type, frame));
        }
        ControlFlow::Continue(())
    }

    fn record_content_boundaries(&mut self, item_type: LayoutItemType, month_origin: Point) {
        match item_type {
            LayoutItemType::MonthHeader { month }
                if month == self.content.month_range().lower_bound() =>
            {
                self.content_start_boundary =
                    Some(self.frame_provider.content_start_boundary(month_origin));
            }
            LayoutItemType::Day { day } if day == self.content.day_range().upper_bound() => {
                self.content_end_boundary = Some(
                    self.frame_provider
                        .content_end_boundary(day.month(), month_origin),
                );
            }
            _ => {}
        }
    }

    /// Whether this item, and therefore every later item in `direction`, lies
    /// past the extended bounds along the scroll axis.
    fn is_beyond_extended_bounds(
        &self,
        item_type: LayoutItemType,
        frame: Rect,
        month_origin: Point,
        direction: WalkDirection,
    ) -> bool {
        let extended = &self.extended_bounds;
        match self.frame_provider.scroll_axis() {
            ScrollAxis::Vertical => match direction {
                WalkDirection::Backward => frame.max_y() <= extended.min_y(),
                WalkDirection::Forward => frame.min_y() >= extended.max_y(),
            },
            // Columns of a horizontal month run top to bottom, so the month's
            // x-extent decides, not the item's.
            ScrollAxis::Horizontal => {
                let month_frame = self
                    .frame_provider
                    .frame_of_month(item_type.month(), month_origin);
                match direction {
                    WalkDirection::Backward => month_frame.max_x() <= extended.min_x(),
                    WalkDirection::Forward => month_frame.min_x() >= extended.max_x(),
                }
            }
        }
    }

    fn materialize(&mut self, item: LayoutItem) {
        let content = self.content;
        let providers = content.providers();
        let model = self
            .model_cache
            .get_or_insert_with(VisibleItemType::Layout { item_type: item.item_type }, || {
                layout_item_model(providers, item.item_type)
            });
        let aligned = self.frame_provider.aligned(item.frame);
        self.visible_items.insert(VisibleItem::new(
            model,
            VisibleItemType::Layout {
                item_type: item.item_type,
            },
            aligned,
        ));

        let center = self.bounds.center();
        let item_center = item.frame.center();
        let distance = (item_center.x - center.x).powi(2) + (item_center.y - center.y).powi(2);
        if self
            .centermost
            .as_ref()
            .map_or(true, |(closest, _)| distance < *closest)
        {
            self.centermost = Some((distance, item));
        }

        let month = item.item_type.month();
        self.visible_months.insert(month);
        if let LayoutItemType::Day { day } = item.item_type {
            self.frames_for_visible_days.insert(day, aligned);
        }

        if item.frame.intersects(&self.unobscured_bounds) {
            self.first_visible_month = Some(self.first_visible_month.map_or(month, |m| m.min(month)));
            self.last_visible_month = Some(self.last_visible_month.map_or(month, |m| m.max(month)));
            if let LayoutItemType::Day { day } = item.item_type {
                self.first_visible_day = Some(self.first_visible_day.map_or(day, |d| d.min(day)));
                self.last_visible_day = Some(self.last_visible_day.map_or(day, |d| d.max(day)));
            }
        }
    }

    fn insert_decoration(&mut self, model: ItemModel, item_type: VisibleItemType, frame: Rect) {
        let aligned = self.frame_provider.aligned(frame);
        self.visible_items
            .insert(VisibleItem::new(model, item_type, aligned));
    }

    fn add_month_decorations(&mut self) {
        let content = self.content;
        let providers = content.providers();
        let separator = content.days_of_week_row_separator();
        let pinned = content.months_layout().pins_days_of_week_to_top();
        let months: Vec<(Month, Point)> = self
            .month_origins
            .iter()
            .map(|(month, origin)| (*month, *origin))
            .collect();

        for (month, origin) in months {
            let month_frame = self.frame_provider.frame_of_month(month, origin);
            if !month_frame.intersects(&self.bounds) {
                continue;
            }
            if let Some(model) = providers.month_background.as_ref().and_then(|p| p(month)) {
                self.insert_decoration(model, VisibleItemType::MonthBackground { month }, month_frame);
            }
            if let (Some(options), false) = (separator, pinned) {
                let frame =
                    self.frame_provider
                        .frame_of_days_of_week_row_separator(month, origin, options.height);
                if frame.intersects(&self.bounds) {
                    let item_type = VisibleItemType::DaysOfWeekRowSeparator { month };
                    let model = self
                        .model_cache
                        .get_or_insert_with(item_type, || DefaultModels::separator(options.height));
                    self.insert_decoration(model, item_type, frame);
                }
            }
        }
    }

    fn add_day_backgrounds(&mut self) {
        let Some(provider) = self.content.providers().day_background.clone() else {
            return;
        };
        let days: Vec<(Day, Rect)> = self
            .walked_day_frames
            .iter()
            .filter(|(_, frame)| frame.intersects(&self.bounds))
            .map(|(day, frame)| (*day, *frame))
            .collect();
        for (day, frame) in days {
            if let Some(model) = provider(day) {
                self.insert_decoration(model, VisibleItemType::DayBackground { day }, frame);
            }
        }
    }

    /// One item per configured day range with at least one laid-out day this pass.
    fn add_day_ranges(&mut self) {
        let Some(provider) = self.content.providers().day_range.clone() else {
            return;
        };
        for day_range in self.content.day_ranges().to_vec() {
            let days_and_frames: Vec<(Day, Rect)> = self
                .walked_day_frames
                .range(day_range.lower_bound()..=day_range.upper_bound())
                .map(|(day, frame)| (*day, *frame))
                .collect();
            let Some(union) = days_and_frames
                .iter()
                .map(|(_, frame)| *frame)
                .reduce(|union, frame| union.union(&frame))
            else {
                continue;
            };
            if !union.intersects(&self.bounds) {
                continue;
            }

            let frame = self.frame_provider.aligned(union);
            let to_local = |rect: Rect| rect.offset_by(-frame.x, -frame.y);
            let context = DayRangeLayoutContext {
                day_range,
                days_and_frames: days_and_frames
                    .iter()
                    .map(|(day, day_frame)| (*day, to_local(*day_frame)))
                    .collect(),
                bounding_union_rect_of_days: to_local(union),
            };
            if let Some(model) = provider(&context) {
                self.insert_decoration(model, VisibleItemType::DayRange { day_range }, frame);
            }
        }
    }

    fn add_overlays(&mut self) {
        let Some(provider) = self.content.providers().overlay.clone() else {
            return;
        };
        for location in self.content.overlaid_item_locations().to_vec() {
            let overlaid_frame = match location {
                OverlaidItemLocation::MonthHeader { month } => self
                    .month_origins
                    .get(&month)
                    .map(|origin| self.frame_provider.frame_of_month_header(month, *origin)),
                OverlaidItemLocation::Day { day } => self.walked_day_frames.get(&day).copied(),
            };
            let Some(overlaid_frame) = overlaid_frame else {
                continue;
            };
            if !overlaid_frame.intersects(&self.bounds) {
                continue;
            }
            let context = OverlayLayoutContext {
                overlaid_item_location: location,
                overlaid_item_frame: self
                    .frame_provider
                    .aligned(overlaid_frame.offset_by(-self.bounds.x, -self.bounds.y)),
                available_bounds: Rect::from_origin_size(Point::ZERO, self.bounds.size()),
            };
            if let Some(model) = provider(&context) {
                let bounds = self.bounds;
                self.insert_decoration(model, VisibleItemType::Overlay { location }, bounds);
            }
        }
    }

    fn add_pinned_days_of_week(&mut self) {
        if !self.content.months_layout().pins_days_of_week_to_top() {
            return;
        }
        let bounds_origin = self.bounds.origin();
        let content = self.content;
        let providers = content.providers();

        let background_type = VisibleItemType::PinnedDaysOfWeekRowBackground;
        let model = self
            .model_cache
            .get_or_insert_with(background_type, DefaultModels::pinned_row_background);
        let frame = self
            .frame_provider
            .frame_of_pinned_days_of_week_row_background(bounds_origin);
        self.insert_decoration(model, background_type, frame);

        for position in DayOfWeekPosition::ALL {
            let item_type = VisibleItemType::PinnedDayOfWeek { position };
            let model = self.model_cache.get_or_insert_with(item_type, || {
                providers
                    .day_of_week
                    .as_ref()
                    .and_then(|p| p(None, position))
                    .unwrap_or_else(|| DefaultModels::day_of_week(None, position))
            });
            let frame = self
                .frame_provider
                .frame_of_pinned_day_of_week(position, bounds_origin);
            self.insert_decoration(model, item_type, frame);
        }

        if let Some(options) = self.content.days_of_week_row_separator() {
            let item_type = VisibleItemType::PinnedDaysOfWeekRowSeparator;
            let model = self
                .model_cache
                .get_or_insert_with(item_type, || DefaultModels::separator(options.height));
            let frame = self
                .frame_provider
                .frame_of_pinned_days_of_week_row_separator(bounds_origin, options.height);
            self.insert_decoration(model, item_type, frame);
        }
    }

    fn finish(mut self) -> VisibleItemsDetails {
        self.add_month_decorations();
        self.add_day_backgrounds();
        self.add_day_ranges();
        self.add_overlays();
        self.add_pinned_days_of_week();

        let frames_for_visible_months = self
            .visible_months
            .iter()
            .filter_map(|month| {
                self.month_origins.get(month).map(|origin| {
                    (
                        *month,
                        self.frame_provider
                            .aligned(self.frame_provider.frame_of_month(*month, *origin)),
                    )
                })
            })
            .collect();

        let max_month_height = self
            .month_origins
            .keys()
            .map(|month| self.frame_provider.height_of_month(*month))
            .fold(0.0, f64::max);

        let minimum_scroll_offset = self
            .content_start_boundary
            .map(|start| self.frame_provider.minimum_scroll_offset(start));
        let maximum_scroll_offset = self
            .content_end_boundary
            .map(|end| self.frame_provider.maximum_scroll_offset(end))
            .map(|maximum| minimum_scroll_offset.map_or(maximum, |minimum| maximum.max(minimum)));

        let visible_day_range = self
            .first_visible_day
            .zip(self.last_visible_day)
            .and_then(|(first, last)| DayRange::new(first, last).ok());
        let visible_month_range = self
            .first_visible_month
            .zip(self.last_visible_month)
            .and_then(|(first, last)| MonthRange::new(first, last).ok());

        let centermost_layout_item = self
            .centermost
            .map_or(self.anchor, |(_, item)| item);

        debug!(
            visible_items = self.visible_items.len(),
            months_walked = self.month_origins.len(),
            days_walked = self.walked_day_frames.len(),
            centermost = %centermost_layout_item.item_type,
            minimum_scroll_offset = ?minimum_scroll_offset,
            maximum_scroll_offset = ?maximum_scroll_offset,
            "computed visible items"
        );

        VisibleItemsDetails {
            visible_items: self.visible_items,
            centermost_layout_item,
            visible_day_range,
            visible_month_range,
            frames_for_visible_months,
            frames_for_visible_days: self.frames_for_visible_days,
            content_start_boundary: self.content_start_boundary,
            content_end_boundary: self.content_end_boundary,
            minimum_scroll_offset,
            maximum_scroll_offset,
            height_of_pinned_content: self.frame_provider.height_of_pinned_content(),
            max_month_height,
        }
    }
}

/// Provider model for a core layout item, or the default when the provider is
/// absent or declines.
fn layout_item_model(providers: &ItemProviders, item_type: LayoutItemType) -> ItemModel {
    match item_type {
        LayoutItemType::MonthHeader { month } => providers
            .month_header
            .as_ref()
            .and_then(|p| p(month))
            .unwrap_or_else(|| DefaultModels::month_header(month)),
        LayoutItemType::DayOfWeekInMonth { position, month } => providers
            .day_of_week
            .as_ref()
            .and_then(|p| p(Some(month), position))
            .unwrap_or_else(|| DefaultModels::day_of_week(Some(month), position)),
        LayoutItemType::Day { day } => providers
            .day
            .as_ref()
            .and_then(|p| p(day))
            .unwrap_or_else(|| DefaultModels::day(day)),
    }
}

#[cfg(test)]
#[path = "visible_items_tests.rs"]
mod tests;
