//! Calendar content configuration.
//!
//! A [`CalendarContent`] is an immutable snapshot: the date range, the months
//! layout, sizing rules, and the item model providers. A new snapshot triggers a
//! full recomputation of layout, never an incremental patch.

use chrono::NaiveDate;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use super::item_model::{
    DayBackgroundItemProvider, DayItemProvider, DayOfWeekItemProvider, DayRangeItemProvider,
    MonthBackgroundItemProvider, MonthHeaderItemProvider, OverlaidItemLocation,
    OverlayItemProvider,
};
use super::types::{EdgeInsets, ScrollAxis};
use crate::model::{Calendar, ContentError, Day, DayRange, Month, MonthRange};

/// Supported interval for day and weekday aspect ratios.
pub const ASPECT_RATIO_RANGE: RangeInclusive<f64> = 0.5..=3.0;

/// Options for vertically stacked months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerticalMonthsLayoutOptions {
    /// Render one weekday row fixed at the top of the viewport instead of one per month.
    pub pin_days_of_week_to_top: bool,
    /// Show every day of the first and last month, not only those in the date range.
    pub always_show_complete_boundary_months: bool,
}

/// Where paginated horizontal scrolling comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRestingPosition {
    /// Pages are one month plus inter-month spacing wide.
    AtLeadingEdgeOfEachMonth,
    /// Pages are one calendar width wide.
    AtIncrementsOfCalendarWidth,
}

/// Scrolling behavior for horizontal layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollingBehavior {
    /// Scrolling stops wherever the gesture leaves it.
    #[default]
    FreeScrolling,
    /// Drags settle on page boundaries.
    Paginated(PageRestingPosition),
}

/// Options for horizontally paged months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalMonthsLayoutOptions {
    /// Number of months that fit in the calendar width (may be fractional to
    /// reveal part of the next month).
    pub maximum_fully_visible_months: f64,
    /// Free or paginated scrolling.
    pub scrolling_behavior: ScrollingBehavior,
}

impl Default for HorizontalMonthsLayoutOptions {
    fn default() -> Self {
        Self {
            maximum_fully_visible_months: 1.0,
            scrolling_behavior: ScrollingBehavior::default(),
        }
    }
}

impl HorizontalMonthsLayoutOptions {
    /// Width of one month given the available calendar width.
    pub fn month_width(&self, calendar_width: f64, inter_month_spacing: f64) -> f64 {
        let visible_spacing = self.maximum_fully_visible_months.floor() * inter_month_spacing;
        (calendar_width - visible_spacing) / self.maximum_fully_visible_months
    }
}

/// How months are arranged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthsLayout {
    /// Months stacked top to bottom, scrolling vertically.
    Vertical(VerticalMonthsLayoutOptions),
    /// Months side by side, scrolling horizontally.
    Horizontal(HorizontalMonthsLayoutOptions),
}

impl Default for MonthsLayout {
    fn default() -> Self {
        Self::Vertical(VerticalMonthsLayoutOptions::default())
    }
}

impl MonthsLayout {
    /// Axis along which this layout scrolls.
    pub fn scroll_axis(&self) -> ScrollAxis {
        match self {
            Self::Vertical(_) => ScrollAxis::Vertical,
            Self::Horizontal(_) => ScrollAxis::Horizontal,
        }
    }

    /// Whether a single weekday row is pinned to the top of the viewport.
    pub fn pins_days_of_week_to_top(&self) -> bool {
        matches!(self, Self::Vertical(options) if options.pin_days_of_week_to_top)
    }

    /// Horizontal layouts always show complete boundary months.
    pub fn always_show_complete_boundary_months(&self) -> bool {
        match self {
            Self::Vertical(options) => options.always_show_complete_boundary_months,
            Self::Horizontal(_) => true,
        }
    }
}

/// Height of a month header.
#[derive(Clone)]
pub enum MonthHeaderHeight {
    /// Same height for every month; validated when the content is built.
    Fixed(f64),
    /// Height computed per month by a host callback.
    PerMonth(Arc<dyn Fn(Month) -> f64 + Send + Sync>),
}

impl MonthHeaderHeight {
    /// Header height for `month`.
    ///
    /// # Panics
    /// If a [`PerMonth`](Self::PerMonth) callback returns a negative or
    /// non-finite height.
    pub fn height(&self, month: Month) -> f64 {
        match self {
            Self::Fixed(height) => *height,
            Self::PerMonth(provider) => {
                let height = provider(month);
                assert!(
                    height.is_finite() && height >= 0.0,
                    "month header height for {month} must be non-negative and finite, got {height}"
                );
                height
            }
        }
    }
}

impl fmt::Debug for MonthHeaderHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            Self::PerMonth(_) => f.write_str("PerMonth(..)"),
        }
    }
}

/// Row separator options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatorOptions {
    /// Separator thickness in points.
    pub height: f64,
}

/// Item model providers. Every provider is optional; missing core providers
/// fall back to the default models.
#[derive(Clone, Default)]
pub struct ItemProviders {
    /// Month header models.
    pub month_header: Option<MonthHeaderItemProvider>,
    /// Weekday label models, for in-month and pinned rows.
    pub day_of_week: Option<DayOfWeekItemProvider>,
    /// Day cell models.
    pub day: Option<DayItemProvider>,
    /// Decorations behind each visible month.
    pub month_background: Option<MonthBackgroundItemProvider>,
    /// Decorations behind individual days.
    pub day_background: Option<DayBackgroundItemProvider>,
    /// One decoration per visible day range.
    pub day_range: Option<DayRangeItemProvider>,
    /// Items drawn over a day or month header.
    pub overlay: Option<OverlayItemProvider>,
}

impl fmt::Debug for ItemProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemProviders")
            .field("month_header", &self.month_header.is_some())
            .field("day_of_week", &self.day_of_week.is_some())
            .field("day", &self.day.is_some())
            .field("month_background", &self.month_background.is_some())
            .field("day_background", &self.day_background.is_some())
            .field("day_range", &self.day_range.is_some())
            .field("overlay", &self.overlay.is_some())
            .finish()
    }
}

/// Immutable calendar content snapshot.
#[derive(Debug, Clone)]
pub struct CalendarContent {
    calendar: Calendar,
    visible_date_range: RangeInclusive<NaiveDate>,
    month_range: MonthRange,
    day_range: DayRange,
    months_layout: MonthsLayout,
    month_day_insets: EdgeInsets,
    inter_month_spacing: f64,
    vertical_day_margin: f64,
    horizontal_day_margin: f64,
    day_aspect_ratio: f64,
    day_of_week_aspect_ratio: f64,
    month_header_height: MonthHeaderHeight,
    days_of_week_row_separator: Option<SeparatorOptions>,
    providers: ItemProviders,
    day_ranges: Vec<DayRange>,
    overlaid_item_locations: Vec<OverlaidItemLocation>,
}

impl CalendarContent {
    /// Start building content for `visible_date_range`.
    pub fn builder(
        calendar: Calendar,
        visible_date_range: RangeInclusive<NaiveDate>,
        months_layout: MonthsLayout,
    ) -> CalendarContentBuilder {
        CalendarContentBuilder::new(calendar, visible_date_range, months_layout)
    }

    /// Calendar used for month and weekday arithmetic.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Date range the content was built from.
    pub fn visible_date_range(&self) -> &RangeInclusive<NaiveDate> {
        &self.visible_date_range
    }

    /// Months that are laid out.
    pub fn month_range(&self) -> MonthRange {
        self.month_range
    }

    /// Days that are laid out. Equals the visible date range unless complete
    /// boundary months are shown.
    pub fn day_range(&self) -> DayRange {
        self.day_range
    }

    /// Vertical or horizontal arrangement.
    pub fn months_layout(&self) -> &MonthsLayout {
        &self.months_layout
    }

    /// Padding between a month's edges and its cells.
    pub fn month_day_insets(&self) -> EdgeInsets {
        self.month_day_insets
    }

    /// Gap between consecutive months.
    pub fn inter_month_spacing(&self) -> f64 {
        self.inter_month_spacing
    }

    /// Gap between rows of days.
    pub fn vertical_day_margin(&self) -> f64 {
        self.vertical_day_margin
    }

    /// Gap between columns of days.
    pub fn horizontal_day_margin(&self) -> f64 {
        self.horizontal_day_margin
    }

    /// Day height divided by day width.
    pub fn day_aspect_ratio(&self) -> f64 {
        self.day_aspect_ratio
    }

    /// Weekday cell height divided by its width.
    pub fn day_of_week_aspect_ratio(&self) -> f64 {
        self.day_of_week_aspect_ratio
    }

    /// Header height for `month`.
    pub fn month_header_height(&self, month: Month) -> f64 {
        self.month_header_height.height(month)
    }

    /// Separator under weekday rows, if any.
    pub fn days_of_week_row_separator(&self) -> Option<SeparatorOptions> {
        self.days_of_week_row_separator
    }

    /// Host callbacks supplying item models.
    pub fn providers(&self) -> &ItemProviders {
        &self.providers
    }

    /// Day ranges that get a decoration each.
    pub fn day_ranges(&self) -> &[DayRange] {
        &self.day_ranges
    }

    /// Locations that get an overlay item.
    pub fn overlaid_item_locations(&self) -> &[OverlaidItemLocation] {
        &self.overlaid_item_locations
    }
}

/// Builder for [`CalendarContent`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CalendarContentBuilder {
    calendar: Calendar,
    visible_date_range: RangeInclusive<NaiveDate>,
    months_layout: MonthsLayout,
    month_day_insets: EdgeInsets,
    inter_month_spacing: f64,
    vertical_day_margin: f64,
    horizontal_day_margin: f64,
    day_aspect_ratio: f64,
    day_of_week_aspect_ratio: f64,
    month_header_height: MonthHeaderHeight,
    days_of_week_row_separator: Option<SeparatorOptions>,
    providers: ItemProviders,
    day_ranges: Vec<DayRange>,
    overlaid_item_locations: Vec<OverlaidItemLocation>,
}

impl CalendarContentBuilder {
    /// Builder with no insets, spacing or margins, square days and 44 point
    /// month headers.
    pub fn new(
        calendar: Calendar,
        visible_date_range: RangeInclusive<NaiveDate>,
        months_layout: MonthsLayout,
    ) -> Self {
        Self {
            calendar,
            visible_date_range,
            months_layout,
            month_day_insets: EdgeInsets::ZERO,
            inter_month_spacing: 0.0,
            vertical_day_margin: 0.0,
            horizontal_day_margin: 0.0,
            day_aspect_ratio: 1.0,
            day_of_week_aspect_ratio: 1.0,
            month_header_height: MonthHeaderHeight::Fixed(44.0),
            days_of_week_row_separator: None,
            providers: ItemProviders::default(),
            day_ranges: Vec::new(),
            overlaid_item_locations: Vec::new(),
        }
    }

    /// Padding between a month's edges and its cells.
    pub fn month_day_insets(mut self, insets: EdgeInsets) -> Self {
        self.month_day_insets = insets;
        self
    }

    /// Gap between consecutive months.
    pub fn inter_month_spacing(mut self, spacing: f64) -> Self {
        self.inter_month_spacing = spacing;
        self
    }

    /// Gap between rows of days.
    pub fn vertical_day_margin(mut self, margin: f64) -> Self {
        self.vertical_day_margin = margin;
        self
    }

    /// Gap between columns of days.
    pub fn horizontal_day_margin(mut self, margin: f64) -> Self {
        self.horizontal_day_margin = margin;
        self
    }

    /// Day height divided by day width, in `0..=3`.
    pub fn day_aspect_ratio(mut self, ratio: f64) -> Self {
        self.day_aspect_ratio = ratio;
        self
    }

    /// Weekday cell height divided by its width, in `0..=3`.
    pub fn day_of_week_aspect_ratio(mut self, ratio: f64) -> Self {
        self.day_of_week_aspect_ratio = ratio;
        self
    }

    /// Fixed or per-month header height.
    pub fn month_header_height(mut self, height: MonthHeaderHeight) -> Self {
        self.month_header_height = height;
        self
    }

    /// Separator under weekday rows; `None` for none.
    pub fn days_of_week_row_separator(mut self, options: Option<SeparatorOptions>) -> Self {
        self.days_of_week_row_separator = options;
        self
    }

    /// Item model callbacks.
    pub fn providers(mut self, providers: ItemProviders) -> Self {
        self.providers = providers;
        self
    }

    /// Day ranges to decorate.
    pub fn day_ranges(mut self, ranges: impl IntoIterator<Item = DayRange>) -> Self {
        self.day_ranges = ranges.into_iter().collect();
        self
    }

    /// Locations to overlay.
    pub fn overlaid_item_locations(
        mut self,
        locations: impl IntoIterator<Item = OverlaidItemLocation>,
    ) -> Self {
        self.overlaid_item_locations = locations.into_iter().collect();
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<CalendarContent, ContentError> {
        let lower = *self.visible_date_range.start();
        let upper = *self.visible_date_range.end();
        let exact_days = DayRange::from_dates(lower, upper)?;
        let month_range = MonthRange::new(
            self.calendar.month_containing(lower),
            self.calendar.month_containing(upper),
        )?;

        check_aspect_ratio("day_aspect_ratio", self.day_aspect_ratio)?;
        check_aspect_ratio("day_of_week_aspect_ratio", self.day_of_week_aspect_ratio)?;
        check_length("inter_month_spacing", self.inter_month_spacing)?;
        check_length("vertical_day_margin", self.vertical_day_margin)?;
        check_length("horizontal_day_margin", self.horizontal_day_margin)?;
        for (setting, value) in [
            ("month_day_insets.top", self.month_day_insets.top),
            ("month_day_insets.leading", self.month_day_insets.leading),
            ("month_day_insets.bottom", self.month_day_insets.bottom),
            ("month_day_insets.trailing", self.month_day_insets.trailing),
        ] {
            check_length(setting, value)?;
        }
        if let MonthHeaderHeight::Fixed(height) = self.month_header_height {
            check_length("month_header_height", height)?;
        }
        if let Some(separator) = self.days_of_week_row_separator {
            check_length("days_of_week_row_separator.height", separator.height)?;
        }
        if let MonthsLayout::Horizontal(options) = self.months_layout {
            let visible = options.maximum_fully_visible_months;
            if !visible.is_finite() || visible < 1.0 {
                return Err(ContentError::FullyVisibleMonths(visible));
            }
        }

        let day_range = if self.months_layout.always_show_complete_boundary_months() {
            DayRange::new(
                Day::first_of(month_range.lower_bound()),
                Day::last_of(month_range.upper_bound()),
            )?
        } else {
            exact_days
        };

        Ok(CalendarContent {
            calendar: self.calendar,
            visible_date_range: self.visible_date_range,
            month_range,
            day_range,
            months_layout: self.months_layout,
            month_day_insets: self.month_day_insets,
            inter_month_spacing: self.inter_month_spacing,
            vertical_day_margin: self.vertical_day_margin,
            horizontal_day_margin: self.horizontal_day_margin,
            day_aspect_ratio: self.day_aspect_ratio,
            day_of_week_aspect_ratio: self.day_of_week_aspect_ratio,
            month_header_height: self.month_header_height,
            days_of_week_row_separator: self.days_of_week_row_separator,
            providers: self.providers,
            day_ranges: self.day_ranges,
            overlaid_item_locations: self.overlaid_item_locations,
        })
    }
}

fn check_aspect_ratio(setting: &'static str, value: f64) -> Result<(), ContentError> {
    if ASPECT_RATIO_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(ContentError::AspectRatioOutOfRange {
            setting,
            value,
            min: *ASPECT_RATIO_RANGE.start(),
            max: *ASPECT_RATIO_RANGE.end(),
        })
    }
}

fn check_length(setting: &'static str, value: f64) -> Result<(), ContentError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ContentError::InvalidLength { setting, value })
    }
}
