//! Scroll metrics mutator - a large, finite, self-recentering scroll space.
//!
//! The calendar never knows how far it is from the start of its date range in
//! absolute terms. Layout happens relative to an anchor, so the scroll view only
//! needs a coordinate space big enough for any single gesture. That space is
//! kept centered by periodically relabeling coordinates ("looping"), which keeps
//! every offset small enough that `f64` frames stay exact at pixel precision.

use serde::Serialize;
use tracing::trace;

use super::layout_item::LayoutItem;
use super::types::ScrollAxis;

/// Size of the scrollable coordinate space along the scroll axis.
pub const SCROLL_SPACE_SIZE: f64 = 10_000_000.0;

/// Accessor for the host's scroll view, one axis at a time.
///
/// Content spans `[-start_inset, size + end_inset]`, so valid offsets are
/// `[-start_inset, size + end_inset - viewport_length]`.
pub trait ScrollMetricsProvider {
    /// Content length along `axis`.
    fn size(&self, axis: ScrollAxis) -> f64;
    /// Set the content length along `axis`.
    fn set_size(&mut self, axis: ScrollAxis, size: f64);
    /// Current offset along `axis`.
    fn offset(&self, axis: ScrollAxis) -> f64;
    /// Move to `offset` along `axis`.
    fn set_offset(&mut self, axis: ScrollAxis, offset: f64);
    /// Extra scrollable space before the content.
    fn start_inset(&self, axis: ScrollAxis) -> f64;
    /// Set the space before the content.
    fn set_start_inset(&mut self, axis: ScrollAxis, inset: f64);
    /// Extra scrollable space after the content.
    fn end_inset(&self, axis: ScrollAxis) -> f64;
    /// Set the space after the content.
    fn set_end_inset(&mut self, axis: ScrollAxis, inset: f64);
}

/// Metrics for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisScrollMetrics {
    /// Content length.
    pub size: f64,
    /// Scroll offset.
    pub offset: f64,
    /// Space before the content.
    pub start_inset: f64,
    /// Space after the content.
    pub end_inset: f64,
}

/// In-memory scroll view metrics for headless use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollMetrics {
    /// Vertical axis.
    pub vertical: AxisScrollMetrics,
    /// Horizontal axis.
    pub horizontal: AxisScrollMetrics,
}

impl ScrollMetrics {
    fn axis(&self, axis: ScrollAxis) -> &AxisScrollMetrics {
        match axis {
            ScrollAxis::Vertical => &self.vertical,
            ScrollAxis::Horizontal => &self.horizontal,
        }
    }

    fn axis_mut(&mut self, axis: ScrollAxis) -> &mut AxisScrollMetrics {
        match axis {
            ScrollAxis::Vertical => &mut self.vertical,
            ScrollAxis::Horizontal => &mut self.horizontal,
        }
    }
}

impl ScrollMetricsProvider for ScrollMetrics {
    fn size(&self, axis: ScrollAxis) -> f64 {
        self.axis(axis).size
    }

    fn set_size(&mut self, axis: ScrollAxis, size: f64) {
        self.axis_mut(axis).size = size;
    }

    fn offset(&self, axis: ScrollAxis) -> f64 {
        self.axis(axis).offset
    }

    fn set_offset(&mut self, axis: ScrollAxis, offset: f64) {
        self.axis_mut(axis).offset = offset;
    }

    fn start_inset(&self, axis: ScrollAxis) -> f64 {
        self.axis(axis).start_inset
    }

    fn set_start_inset(&mut self, axis: ScrollAxis, inset: f64) {
        self.axis_mut(axis).start_inset = inset;
    }

    fn end_inset(&self, axis: ScrollAxis) -> f64 {
        self.axis(axis).end_inset
    }

    fn set_end_inset(&mut self, axis: ScrollAxis, inset: f64) {
        self.axis_mut(axis).end_inset = inset;
    }
}

/// Owns all writes to the scroll metrics of one axis.
///
/// # Invariants
/// - After setup, `size == SCROLL_SPACE_SIZE`.
/// - Boundary updates never move the offset.
/// - Looping moves the offset and the caller's anchor by the same delta.
#[derive(Debug)]
pub struct ScrollMetricsMutator<P: ScrollMetricsProvider> {
    provider: P,
    axis: ScrollAxis,
    viewport_length: f64,
    has_set_up_initial_metrics: bool,
    is_boundless_at_start: bool,
    is_boundless_at_end: bool,
}

impl<P: ScrollMetricsProvider> ScrollMetricsMutator<P> {
    /// Mutator for `axis`. Metrics are set up lazily on the first pass.
    pub fn new(provider: P, axis: ScrollAxis, viewport_length: f64) -> Self {
        Self {
            provider,
            axis,
            viewport_length,
            has_set_up_initial_metrics: false,
            is_boundless_at_start: true,
            is_boundless_at_end: true,
        }
    }

    /// Underlying scroll view metrics.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Axis being managed.
    pub fn axis(&self) -> ScrollAxis {
        self.axis
    }

    /// Switching axes starts over with fresh metrics on the new axis.
    pub fn set_axis(&mut self, axis: ScrollAxis) {
        if axis != self.axis {
            self.axis = axis;
            self.has_set_up_initial_metrics = false;
            self.is_boundless_at_start = true;
            self.is_boundless_at_end = true;
        }
    }

    /// Viewport length along the axis, used for the maximum offset.
    pub fn set_viewport_length(&mut self, length: f64) {
        self.viewport_length = length;
    }

    /// Current offset along the axis.
    pub fn offset(&self) -> f64 {
        self.provider.offset(self.axis)
    }

    /// True until the start of the content has been laid out.
    pub fn is_boundless_at_start(&self) -> bool {
        self.is_boundless_at_start
    }

    /// True until the end of the content has been laid out.
    pub fn is_boundless_at_end(&self) -> bool {
        self.is_boundless_at_end
    }

    /// Smallest offset the scroll view allows.
    pub fn minimum_offset(&self) -> f64 {
        -self.provider.start_inset(self.axis)
    }

    /// Largest offset the scroll view allows.
    pub fn maximum_offset(&self) -> f64 {
        let maximum = self.provider.size(self.axis) + self.provider.end_inset(self.axis)
            - self.viewport_length;
        maximum.max(self.minimum_offset())
    }

    /// `offset` restricted to what the scroll view allows.
    pub fn clamped(&self, offset: f64) -> f64 {
        offset.min(self.maximum_offset()).max(self.minimum_offset())
    }

    /// Center the offset in a fresh coordinate space with no boundaries. Only the
    /// first call has an effect.
    pub fn set_up_initial_metrics_if_needed(&mut self) {
        if self.has_set_up_initial_metrics {
            return;
        }
        self.provider.set_size(self.axis, SCROLL_SPACE_SIZE);
        self.provider.set_start_inset(self.axis, 0.0);
        self.provider.set_end_inset(self.axis, 0.0);
        self.provider.set_offset(self.axis, SCROLL_SPACE_SIZE / 2.0);
        self.is_boundless_at_start = true;
        self.is_boundless_at_end = true;
        self.has_set_up_initial_metrics = true;
    }

    /// Turn known content boundaries into insets; `None` restores a boundless end.
    pub fn update_scroll_boundaries(
        &mut self,
        minimum_scroll_offset: Option<f64>,
        maximum_scroll_offset: Option<f64>,
    ) {
        let offset = self.provider.offset(self.axis);
        let size = self.provider.size(self.axis);

        let start_inset = minimum_scroll_offset.map_or(0.0, |minimum| -minimum);
        let end_inset = maximum_scroll_offset
            .map_or(0.0, |maximum| maximum + self.viewport_length - size);
        self.provider.set_start_inset(self.axis, start_inset);
        self.provider.set_end_inset(self.axis, end_inset);
        self.is_boundless_at_start = minimum_scroll_offset.is_none();
        self.is_boundless_at_end = maximum_scroll_offset.is_none();

        self.provider.set_offset(self.axis, offset);
    }

    /// Move the offset by `delta` without clamping.
    pub fn apply_offset(&mut self, delta: f64) {
        let offset = self.provider.offset(self.axis);
        self.provider.set_offset(self.axis, offset + delta);
    }

    /// Recenter the offset if it drifted into the outer third of the space.
    ///
    /// Returns `item` translated by the same amount, so its position relative to
    /// the viewport is unchanged. Insets set before the loop are stale until the
    /// next [`update_scroll_boundaries`](Self::update_scroll_boundaries).
    pub fn loop_offset_if_needed(&mut self, item: LayoutItem) -> LayoutItem {
        if !self.has_set_up_initial_metrics {
            return item;
        }
        let size = self.provider.size(self.axis);
        let offset = self.provider.offset(self.axis);
        let third = size / 3.0;
        let delta = if offset < third {
            third
        } else if offset > size - third {
            -third
        } else {
            return item;
        };

        trace!(offset, delta, "looping scroll offset");
        self.provider.set_offset(self.axis, offset + delta);
        LayoutItem::new(
            item.item_type,
            self.axis.offset(&item.frame, delta),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Month;
    use crate::view_state::layout_item::LayoutItemType;
    use crate::view_state::types::Rect;

    fn mutator() -> ScrollMetricsMutator<ScrollMetrics> {
        let mut mutator =
            ScrollMetricsMutator::new(ScrollMetrics::default(), ScrollAxis::Vertical, 480.0);
        mutator.set_up_initial_metrics_if_needed();
        mutator
    }

    fn anchor_at(y: f64) -> LayoutItem {
        LayoutItem::new(
            LayoutItemType::month_header(Month::new(2020, 1).unwrap()),
            Rect::new(0.0, y, 320.0, 44.0),
        )
    }

    mod setup {
        use super::*;

        #[test]
        fn offset_starts_centered() {
            let m = mutator();
            assert_eq!(m.offset(), SCROLL_SPACE_SIZE / 2.0);
            assert_eq!(m.provider().vertical.size, SCROLL_SPACE_SIZE);
            assert!(m.is_boundless_at_start());
            assert!(m.is_boundless_at_end());
        }

        #[test]
        fn setup_only_happens_once() {
            let mut m = mutator();
            m.apply_offset(123.0);
            m.set_up_initial_metrics_if_needed();
            assert_eq!(m.offset(), SCROLL_SPACE_SIZE / 2.0 + 123.0);
        }

        #[test]
        fn axis_change_resets_setup() {
            let mut m = mutator();
            m.set_axis(ScrollAxis::Horizontal);
            m.set_up_initial_metrics_if_needed();
            assert_eq!(m.provider().horizontal.offset, SCROLL_SPACE_SIZE / 2.0);
        }
    }

    mod boundaries {
        use super::*;

        #[test]
        fn boundaries_become_insets_without_moving_offset() {
            let mut m = mutator();
            let offset = m.offset();
            m.update_scroll_boundaries(Some(offset - 100.0), Some(offset + 200.0));

            assert_eq!(m.offset(), offset);
            assert_eq!(m.minimum_offset(), offset - 100.0);
            assert_eq!(m.maximum_offset(), offset + 200.0);
            assert!(!m.is_boundless_at_start());
            assert!(!m.is_boundless_at_end());
        }

        #[test]
        fn missing_boundary_restores_boundless_end() {
            let mut m = mutator();
            let offset = m.offset();
            m.update_scroll_boundaries(Some(offset), None);
            m.update_scroll_boundaries(None, None);
            assert_eq!(m.minimum_offset(), 0.0);
            assert_eq!(m.maximum_offset(), SCROLL_SPACE_SIZE - 480.0);
            assert!(m.is_boundless_at_start());
        }

        #[test]
        fn clamped_respects_both_boundaries() {
            let mut m = mutator();
            let offset = m.offset();
            m.update_scroll_boundaries(Some(offset - 10.0), Some(offset + 10.0));
            assert_eq!(m.clamped(offset - 50.0), offset - 10.0);
            assert_eq!(m.clamped(offset + 50.0), offset + 10.0);
            assert_eq!(m.clamped(offset), offset);
        }
    }

    mod looping {
        use super::*;

        #[test]
        fn offset_in_middle_third_is_left_alone() {
            let mut m = mutator();
            let anchor = anchor_at(m.offset() + 10.0);
            assert_eq!(m.loop_offset_if_needed(anchor), anchor);
            assert_eq!(m.offset(), SCROLL_SPACE_SIZE / 2.0);
        }

        #[test]
        fn looping_preserves_anchor_position_relative_to_viewport() {
            for drift in [-3_000_000.0, 3_000_000.0] {
                let mut m = mutator();
                m.apply_offset(drift);
                let before_offset = m.offset();
                let anchor = anchor_at(before_offset + 37.5);

                let looped = m.loop_offset_if_needed(anchor);
                let after_offset = m.offset();

                assert_ne!(after_offset, before_offset);
                assert!(after_offset > SCROLL_SPACE_SIZE / 3.0);
                assert!(after_offset < SCROLL_SPACE_SIZE * 2.0 / 3.0);
                let before = anchor.frame.y - before_offset;
                let after = looped.frame.y - after_offset;
                assert!((after - before).abs() < 1e-6, "{before} != {after}");
                assert_eq!(looped.item_type, anchor.item_type);
            }
        }

        #[test]
        fn looping_with_known_boundary_keeps_it_reachable() {
            let mut m = mutator();
            m.update_scroll_boundaries(Some(m.offset()), None);
            m.apply_offset(3_000_000.0);
            let offset = m.offset();
            let anchor = anchor_at(offset);

            let looped = m.loop_offset_if_needed(anchor);
            let delta = m.offset() - offset;
            assert!(delta < 0.0);
            assert!((looped.frame.y - (anchor.frame.y + delta)).abs() < 1e-6);

            // Boundaries recomputed in the new coordinates.
            m.update_scroll_boundaries(Some(SCROLL_SPACE_SIZE / 2.0 + delta), None);
            assert!(m.minimum_offset() < m.offset());
        }

        #[test]
        fn nothing_loops_before_setup() {
            let mut m =
                ScrollMetricsMutator::new(ScrollMetrics::default(), ScrollAxis::Vertical, 480.0);
            let anchor = anchor_at(0.0);
            assert_eq!(m.loop_offset_if_needed(anchor), anchor);
        }
    }
}
