//! View-state layer - Layout, scrolling, and view recycling
//!
//! This module implements the virtualized layout engine: given a content
//! snapshot, a viewport, and an anchor item, it computes exactly the items that
//! intersect the viewport, keeps the scroll space centered, and pairs visible
//! items with reusable views.
//!
//! # Module Structure
//!
//! - `types`: Geometry primitives (Point, Size, Rect, EdgeInsets, ScrollAxis)
//! - `layout_item`: LayoutItemType - the ordered set of positioned things
//! - `item_model`: ItemModel, Differentiator, provider contexts
//! - `content`: CalendarContent - immutable configuration snapshot
//! - `enumerator`: LayoutItemTypeEnumerator - neighbor iteration within range
//! - `frame_provider`: FrameProvider - pure geometry
//! - `scroll`: CalendarScrollPosition, ScrollTarget
//! - `visible_item`: VisibleItem - renderable unit with z-order
//! - `visible_range`: VisibleItemsDetails - result of one layout pass
//! - `model_cache`: ItemModelCache - models kept across passes
//! - `visible_items`: VisibleItemsProvider - the bidirectional walk
//! - `reuse`: ItemViewReuseManager - view recycling by differentiator
//! - `scroll_metrics`: ScrollMetricsMutator - looping scroll space
//! - `pagination`: Pagination - resting offsets for paginated layouts

pub mod content;
pub mod enumerator;
pub mod frame_provider;
pub mod item_model;
pub mod layout_item;
pub mod model_cache;
pub mod pagination;
pub mod reuse;
pub mod scroll;
pub mod scroll_metrics;
pub mod types;
pub mod visible_item;
pub mod visible_items;
pub mod visible_range;

pub use content::{
    CalendarContent, CalendarContentBuilder, HorizontalMonthsLayoutOptions, ItemProviders,
    MonthHeaderHeight, MonthsLayout, PageRestingPosition, ScrollingBehavior, SeparatorOptions,
    VerticalMonthsLayoutOptions,
};
pub use enumerator::LayoutItemTypeEnumerator;
pub use frame_provider::FrameProvider;
pub use item_model::{
    DayRangeLayoutContext, DefaultModels, Differentiator, ItemModel, OverlaidItemLocation,
    OverlayLayoutContext,
};
pub use layout_item::{LayoutItem, LayoutItemType};
pub use pagination::Pagination;
pub use reuse::{ItemViewReuseManager, ReuseKind, ReuseStats, ViewAssignment, ViewFactory};
pub use scroll::{CalendarScrollPosition, ScrollTarget, ScrollToItemContext};
pub use scroll_metrics::{ScrollMetrics, ScrollMetricsMutator, ScrollMetricsProvider};
pub use types::{EdgeInsets, Point, Rect, ScrollAxis, Size};
pub use visible_item::{VisibleItem, VisibleItemType};
pub use visible_items::VisibleItemsProvider;
pub use visible_range::VisibleItemsDetails;
