//! Visible items: what a single layout pass asks the host to render.

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::item_model::{Differentiator, ItemModel, OverlaidItemLocation};
use super::layout_item::LayoutItemType;
use super::types::Rect;
use crate::model::{Day, DayOfWeekPosition, DayRange, Month};

/// Kind and identity of a visible item.
///
/// # Ordering
/// Variant order is rendering order: backgrounds first, overlays last. Sorting
/// visible items by this type yields a valid back-to-front z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibleItemType {
    /// Decoration behind a whole month.
    MonthBackground {
        /// Decorated month.
        month: Month,
    },
    /// Decoration spanning the visible days of a range.
    DayRange {
        /// Decorated range.
        day_range: DayRange,
    },
    /// Decoration behind a single day.
    DayBackground {
        /// Decorated day.
        day: Day,
    },
    /// Month header, weekday label or day.
    Layout {
        /// The underlying layout item.
        item_type: LayoutItemType,
    },
    /// Line under a month's own weekday row.
    DaysOfWeekRowSeparator {
        /// Month whose row it underlines.
        month: Month,
    },
    /// Backdrop of the pinned weekday row.
    PinnedDaysOfWeekRowBackground,
    /// Weekday label in the pinned row.
    PinnedDayOfWeek {
        /// Column of the label.
        position: DayOfWeekPosition,
    },
    /// Line under the pinned weekday row.
    PinnedDaysOfWeekRowSeparator,
    /// Item drawn over a day or month header.
    Overlay {
        /// What the overlay is attached to.
        location: OverlaidItemLocation,
    },
}

impl fmt::Display for VisibleItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthBackground { month } => write!(f, "monthBackground({month})"),
            Self::DayRange { day_range } => write!(f, "dayRange({day_range})"),
            Self::DayBackground { day } => write!(f, "dayBackground({day})"),
            Self::Layout { item_type } => write!(f, "{item_type}"),
            Self::DaysOfWeekRowSeparator { month } => {
                write!(f, "daysOfWeekRowSeparator({month})")
            }
            Self::PinnedDaysOfWeekRowBackground => f.write_str("pinnedDaysOfWeekRowBackground"),
            Self::PinnedDayOfWeek { position } => write!(f, "pinnedDayOfWeek({position:?})"),
            Self::PinnedDaysOfWeekRowSeparator => f.write_str("pinnedDaysOfWeekRowSeparator"),
            Self::Overlay { location } => write!(f, "overlay({location:?})"),
        }
    }
}

/// A renderable item with its frame for one layout pass.
///
/// # Identity
/// Equality and hashing cover the item type and the model's differentiator only.
/// The frame and the model's content are transient: an item that moved or whose
/// content changed is still "the same" item and keeps its view. The hash is
/// computed once at construction since items are hashed repeatedly during reuse.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleItem {
    model: ItemModel,
    item_type: VisibleItemType,
    frame: Rect,
    #[serde(skip)]
    identity_hash: u64,
}

impl VisibleItem {
    /// Item of `item_type` rendering `model` at `frame`.
    pub fn new(model: ItemModel, item_type: VisibleItemType, frame: Rect) -> Self {
        let mut hasher = DefaultHasher::new();
        model.differentiator().hash(&mut hasher);
        item_type.hash(&mut hasher);
        Self {
            identity_hash: hasher.finish(),
            model,
            item_type,
            frame,
        }
    }

    /// Model to render.
    pub fn model(&self) -> &ItemModel {
        &self.model
    }

    /// The model's reuse identity.
    pub fn differentiator(&self) -> &Differentiator {
        self.model.differentiator()
    }

    /// Kind and identity of the item.
    pub fn item_type(&self) -> VisibleItemType {
        self.item_type
    }

    /// Pixel-aligned frame in scroll space.
    pub fn frame(&self) -> Rect {
        self.frame
    }
}

impl PartialEq for VisibleItem {
    fn eq(&self, other: &Self) -> bool {
        self.identity_hash == other.identity_hash
            && self.item_type == other.item_type
            && self.model.differentiator() == other.model.differentiator()
    }
}

impl Eq for VisibleItem {}

impl Hash for VisibleItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash);
    }
}
