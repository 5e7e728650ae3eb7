//! Renderable item models and the differentiator used for view reuse.
//!
//! The host's rendering layer owns what a model *looks like*. The engine only
//! needs two things from a model: a [`Differentiator`] (which views may be
//! shared) and opaque content to hand to a view when it is updated.

use serde::Serialize;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::sync::Arc;

use super::types::Rect;
use crate::model::{Day, DayOfWeekPosition, DayRange, Month};

/// Reuse identity of a renderable model.
///
/// Two models with equal differentiators render with the same kind of view and
/// the same invariant configuration (fonts, colors, anything fixed at view
/// creation). Such views are interchangeable: only their content differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Differentiator {
    /// Renderable view kind.
    pub kind: Cow<'static, str>,
    /// Configuration fixed at view creation time.
    pub invariant_configuration: Cow<'static, str>,
}

impl Differentiator {
    /// Differentiator for `kind` views configured with `invariant_configuration`.
    pub fn new(
        kind: impl Into<Cow<'static, str>>,
        invariant_configuration: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind: kind.into(),
            invariant_configuration: invariant_configuration.into(),
        }
    }

    /// Differentiator with empty invariant configuration.
    pub fn of_kind(kind: impl Into<Cow<'static, str>>) -> Self {
        Self::new(kind, "")
    }
}

/// A renderable model: reuse identity plus transient content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemModel {
    differentiator: Differentiator,
    content: Value,
}

impl ItemModel {
    /// Model rendered by `differentiator` views showing `content`.
    pub fn new(differentiator: Differentiator, content: Value) -> Self {
        Self {
            differentiator,
            content,
        }
    }

    /// Which views may render this model.
    pub fn differentiator(&self) -> &Differentiator {
        &self.differentiator
    }

    /// Content handed to the view on update.
    pub fn content(&self) -> &Value {
        &self.content
    }
}

/// View kinds used by the default models.
pub mod default_kinds {
    /// Month title.
    pub const MONTH_HEADER: &str = "default.month_header";
    /// Weekday label.
    pub const DAY_OF_WEEK: &str = "default.day_of_week";
    /// Day number.
    pub const DAY: &str = "default.day";
    /// Line under a weekday row.
    pub const SEPARATOR: &str = "default.separator";
    /// Backdrop of the pinned weekday row.
    pub const PINNED_ROW_BACKGROUND: &str = "default.pinned_row_background";
}

/// Fallback models used when a provider is absent or returns `None`.
pub struct DefaultModels;

impl DefaultModels {
    /// Header showing the month, e.g. `2024-06`.
    pub fn month_header(month: Month) -> ItemModel {
        ItemModel::new(
            Differentiator::of_kind(default_kinds::MONTH_HEADER),
            json!({ "month": month.to_string() }),
        )
    }

    /// Weekday label at column `position`.
    pub fn day_of_week(month: Option<Month>, position: DayOfWeekPosition) -> ItemModel {
        ItemModel::new(
            Differentiator::of_kind(default_kinds::DAY_OF_WEEK),
            json!({
                "month": month.map(|m| m.to_string()),
                "position": position.index(),
            }),
        )
    }

    /// Day cell labeled with its day of the month.
    pub fn day(day: Day) -> ItemModel {
        ItemModel::new(
            Differentiator::of_kind(default_kinds::DAY),
            json!({ "day": day.to_string(), "label": day.day().to_string() }),
        )
    }

    /// Separator line `height` points thick.
    pub fn separator(height: f64) -> ItemModel {
        ItemModel::new(
            Differentiator::of_kind(default_kinds::SEPARATOR),
            json!({ "height": height }),
        )
    }

    /// Backdrop behind the pinned weekday row.
    pub fn pinned_row_background() -> ItemModel {
        ItemModel::new(
            Differentiator::of_kind(default_kinds::PINNED_ROW_BACKGROUND),
            Value::Null,
        )
    }
}

/// Geometry handed to the day range provider.
///
/// All frames are local to the day range item's own frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRangeLayoutContext {
    /// Range being decorated.
    pub day_range: DayRange,
    /// Frames of the laid-out days of the range, in chronological order.
    pub days_and_frames: Vec<(Day, Rect)>,
    /// Union of all day frames.
    pub bounding_union_rect_of_days: Rect,
}

/// Anchor of an overlay item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlaidItemLocation {
    /// Over a month header.
    MonthHeader {
        /// Month whose header is overlaid.
        month: Month,
    },
    /// Over a day.
    Day {
        /// Overlaid day.
        day: Day,
    },
}

/// Geometry handed to the overlay provider.
///
/// Frames are local to the overlay item's frame, which covers the viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLayoutContext {
    /// Item the overlay is attached to.
    pub overlaid_item_location: OverlaidItemLocation,
    /// Frame of that item.
    pub overlaid_item_frame: Rect,
    /// Space the overlay may occupy.
    pub available_bounds: Rect,
}

/// Model for a month header; `None` falls back to the default.
pub type MonthHeaderItemProvider = Arc<dyn Fn(Month) -> Option<ItemModel> + Send + Sync>;
/// `month` is `None` for pinned weekday headers.
pub type DayOfWeekItemProvider =
    Arc<dyn Fn(Option<Month>, DayOfWeekPosition) -> Option<ItemModel> + Send + Sync>;
/// Model for a day; `None` falls back to the default.
pub type DayItemProvider = Arc<dyn Fn(Day) -> Option<ItemModel> + Send + Sync>;
/// Optional decoration behind a month.
pub type MonthBackgroundItemProvider = Arc<dyn Fn(Month) -> Option<ItemModel> + Send + Sync>;
/// Optional decoration behind a day.
pub type DayBackgroundItemProvider = Arc<dyn Fn(Day) -> Option<ItemModel> + Send + Sync>;
/// Optional decoration spanning a day range.
pub type DayRangeItemProvider =
    Arc<dyn Fn(&DayRangeLayoutContext) -> Option<ItemModel> + Send + Sync>;
/// Optional item over a day or month header.
pub type OverlayItemProvider =
    Arc<dyn Fn(&OverlayLayoutContext) -> Option<ItemModel> + Send + Sync>;
