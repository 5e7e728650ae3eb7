//! Tests for VisibleItemsProvider.

use super::*;
use crate::model::Calendar;
use crate::view_state::content::{
    HorizontalMonthsLayoutOptions, MonthsLayout, ScrollingBehavior, VerticalMonthsLayoutOptions,
};
use crate::view_state::item_model::Differentiator;
use chrono::NaiveDate;
use serde_json::json;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const OFFSET: Point = Point {
    x: 0.0,
    y: 5_000_000.0,
};
const EPSILON: f64 = 1e-6;
/// Width of one day cell: (320 - 8 - 8 - 6 * 8) / 7.
const DAY_WIDTH: f64 = 256.0 / 7.0;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> Month {
    Month::new(y, m).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> Day {
    Day::containing(date(y, m, d))
}

fn vertical(pinned: bool) -> MonthsLayout {
    MonthsLayout::Vertical(VerticalMonthsLayoutOptions {
        pin_days_of_week_to_top: pinned,
        always_show_complete_boundary_months: false,
    })
}

fn build_content(
    range: RangeInclusive<NaiveDate>,
    layout: MonthsLayout,
    providers: ItemProviders,
) -> Arc<CalendarContent> {
    Arc::new(
        CalendarContent::builder(Calendar::default(), range, layout)
            .month_day_insets(EdgeInsets::new(0.0, 8.0, 0.0, 8.0))
            .horizontal_day_margin(8.0)
            .vertical_day_margin(4.0)
            .inter_month_spacing(20.0)
            .providers(providers)
            .build()
            .unwrap(),
    )
}

fn provider_with(content: Arc<CalendarContent>, size: Size) -> VisibleItemsProvider {
    VisibleItemsProvider::new(content, size, EdgeInsets::ZERO, 2.0)
}

fn year_2020() -> VisibleItemsProvider {
    provider_with(
        build_content(
            date(2020, 1, 1)..=date(2020, 12, 31),
            vertical(false),
            ItemProviders::default(),
        ),
        Size::new(320.0, 480.0),
    )
}

fn count_of(details: &VisibleItemsDetails, predicate: impl Fn(VisibleItemType) -> bool) -> usize {
    details
        .visible_items
        .iter()
        .filter(|item| predicate(item.item_type()))
        .count()
}

// ===== Initial layout =====

mod initial_layout {
    use super::*;

    #[test]
    fn first_month_is_flush_with_viewport_start() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);

        assert_eq!(details.content_start_boundary, Some(OFFSET.y));
        assert_eq!(details.minimum_scroll_offset, Some(OFFSET.y));
        assert_eq!(details.maximum_scroll_offset, None);
        assert!(details.is_boundless_at_end());
    }

    #[test]
    fn visible_ranges_cover_what_fits_in_the_viewport() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);

        // January is 283.4pt tall; February's third week row straddles y = 480.
        assert_eq!(
            details.visible_day_range,
            Some(DayRange::new(day(2020, 1, 1), day(2020, 2, 15)).unwrap())
        );
        assert_eq!(
            details.visible_month_range,
            Some(MonthRange::new(month(2020, 1), month(2020, 2)).unwrap())
        );
        assert_eq!(details.frames_for_visible_months.len(), 2);
    }

    #[test]
    fn every_visible_item_intersects_the_viewport() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        // Allow for pixel alignment at the edges.
        let bounds = Rect::new(OFFSET.x - 1.0, OFFSET.y - 1.0, 322.0, 482.0);

        assert!(!details.visible_items.is_empty());
        for item in &details.visible_items {
            assert!(
                item.frame().intersects(&bounds),
                "{} at {:?} is outside the viewport",
                item.item_type(),
                item.frame()
            );
        }
    }

    #[test]
    fn weekday_rows_are_laid_out_per_month() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        let weekday_items = count_of(&details, |t| {
            matches!(
                t,
                VisibleItemType::Layout {
                    item_type: LayoutItemType::DayOfWeekInMonth { .. }
                }
            )
        });
        assert_eq!(weekday_items, 14);
    }

    #[test]
    #[should_panic(expected = "outside the laid-out range")]
    fn anchor_outside_range_is_a_contract_violation() {
        let mut provider = year_2020();
        let anchor = LayoutItem::new(
            LayoutItemType::month_header(month(2019, 12)),
            Rect::new(0.0, OFFSET.y, 320.0, 44.0),
        );
        provider.details_for_visible_items(anchor, OFFSET);
    }
}

// ===== Scrolling =====

mod scrolling {
    use super::*;

    #[test]
    fn frames_are_stable_across_passes() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let first = provider.details_for_visible_items(anchor, OFFSET);

        let scrolled = Point::new(OFFSET.x, OFFSET.y + 100.0);
        let second = provider.details_for_visible_items(first.centermost_layout_item, scrolled);

        let shared_day = day(2020, 1, 20);
        let before = first.frames_for_visible_days[&shared_day];
        let after = second.frames_for_visible_days[&shared_day];
        assert!((before.y - after.y).abs() < EPSILON);
        assert!((before.x - after.x).abs() < EPSILON);
    }

    #[test]
    fn centermost_item_is_near_viewport_center() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        let center = details.centermost_layout_item.frame.center();
        assert!((center.y - (OFFSET.y + 240.0)).abs() < DAY_WIDTH);
    }

    #[test]
    fn middle_of_range_is_boundless_on_both_ends() {
        let mut provider = year_2020();
        let anchor = provider.anchor_month_header_item(
            month(2020, 6),
            CalendarScrollPosition::FirstFullyVisiblePosition { padding: 0.0 },
            OFFSET,
        );
        let details = provider.details_for_visible_items(anchor, OFFSET);
        assert_eq!(details.minimum_scroll_offset, None);
        assert_eq!(details.maximum_scroll_offset, None);
        assert_eq!(
            details.visible_month_range.map(|r| r.lower_bound()),
            Some(month(2020, 6))
        );
    }

    #[test]
    fn distant_anchor_is_walked_to_through_extended_bounds() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        // Fling: the new viewport no longer contains the anchor.
        let flung = Point::new(OFFSET.x, OFFSET.y + 1500.0);
        let details = provider.details_for_visible_items(anchor, flung);
        let range = details.visible_month_range.unwrap();
        assert!(range.lower_bound() > month(2020, 1));
        assert!(!details.visible_items.is_empty());
    }
}

// ===== Boundary correction =====

mod boundary_correction {
    use super::*;

    #[test]
    fn centering_first_month_clamps_flush_with_content_start() {
        let provider = year_2020();
        let anchor = provider.anchor_month_header_item(
            month(2020, 1),
            CalendarScrollPosition::Centered,
            OFFSET,
        );
        assert!((anchor.frame.y - OFFSET.y).abs() < EPSILON);
    }

    #[test]
    fn centering_last_month_clamps_flush_with_content_end() {
        let provider = year_2020();
        let anchor = provider.anchor_month_header_item(
            month(2020, 12),
            CalendarScrollPosition::Centered,
            OFFSET,
        );
        let height = provider.frame_provider().height_of_month(month(2020, 12));
        assert!((anchor.frame.y + height - (OFFSET.y + 480.0)).abs() < EPSILON);
    }

    #[test]
    fn short_content_prefers_start_boundary() {
        let provider = provider_with(
            build_content(
                date(2020, 1, 1)..=date(2020, 1, 31),
                vertical(false),
                ItemProviders::default(),
            ),
            Size::new(320.0, 480.0),
        );
        let anchor = provider.anchor_month_header_item(
            month(2020, 1),
            CalendarScrollPosition::LastFullyVisiblePosition { padding: 0.0 },
            OFFSET,
        );
        assert!((anchor.frame.y - OFFSET.y).abs() < EPSILON);
    }

    #[test]
    fn correction_is_idempotent() {
        let provider = year_2020();
        for (m, position) in [
            (1, CalendarScrollPosition::Centered),
            (6, CalendarScrollPosition::Centered),
            (12, CalendarScrollPosition::Centered),
            (12, CalendarScrollPosition::FirstFullyVisiblePosition { padding: 10.0 }),
        ] {
            let once = provider.anchor_month_header_item(month(2020, m), position, OFFSET);
            let twice = provider.boundary_corrected(once, OFFSET);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn mid_range_item_is_left_alone() {
        let provider = year_2020();
        let item = provider.anchor_day_item(
            day(2020, 6, 15),
            CalendarScrollPosition::Centered,
            OFFSET,
        );
        assert!((item.frame.mid_y() - (OFFSET.y + 240.0)).abs() < EPSILON);
    }
}

// ===== Decorations =====

mod decorations {
    use super::*;

    #[test]
    fn day_range_yields_one_item_spanning_its_days() {
        let contexts = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&contexts);
        let range = DayRange::new(day(2020, 3, 11), day(2020, 4, 5)).unwrap();
        let providers = ItemProviders {
            day_range: Some(Arc::new(move |context: &DayRangeLayoutContext| {
                captured.lock().unwrap().push(context.clone());
                Some(ItemModel::new(Differentiator::of_kind("range"), json!(null)))
            })),
            ..ItemProviders::default()
        };
        let content = Arc::new(
            CalendarContent::builder(
                Calendar::default(),
                date(2020, 1, 1)..=date(2020, 12, 31),
                vertical(false),
            )
            .month_day_insets(EdgeInsets::new(0.0, 8.0, 0.0, 8.0))
            .horizontal_day_margin(8.0)
            .vertical_day_margin(4.0)
            .inter_month_spacing(20.0)
            .providers(providers)
            .day_ranges([range])
            .build()
            .unwrap(),
        );
        let mut provider = provider_with(content, Size::new(320.0, 1000.0));
        let anchor = provider.anchor_month_header_item(
            month(2020, 3),
            CalendarScrollPosition::FirstFullyVisiblePosition { padding: 0.0 },
            OFFSET,
        );
        let details = provider.details_for_visible_items(anchor, OFFSET);

        let range_items: Vec<_> = details
            .visible_items
            .iter()
            .filter(|item| matches!(item.item_type(), VisibleItemType::DayRange { .. }))
            .collect();
        assert_eq!(range_items.len(), 1);

        let contexts = contexts.lock().unwrap();
        assert_eq!(contexts.len(), 1);
        let context = &contexts[0];
        assert_eq!(context.day_range, range);
        assert_eq!(context.days_and_frames.len(), 21 + 5);
        assert_eq!(context.days_and_frames[0].0, day(2020, 3, 11));
        assert_eq!(context.days_and_frames[25].0, day(2020, 4, 5));

        let local_union = context
            .days_and_frames
            .iter()
            .map(|(_, frame)| *frame)
            .reduce(|a, b| a.union(&b))
            .unwrap();
        let bounding = context.bounding_union_rect_of_days;
        assert!((local_union.x - bounding.x).abs() < EPSILON);
        assert!((local_union.y - bounding.y).abs() < EPSILON);
        assert!((local_union.width - bounding.width).abs() < EPSILON);
        assert!((local_union.height - bounding.height).abs() < EPSILON);
        // Local coordinates start near the item's own origin.
        assert!(bounding.x.abs() < 1.0 && bounding.y.abs() < 1.0);

        let item_frame = range_items[0].frame();
        assert!((item_frame.width - bounding.width).abs() < 1.0);
        assert!((item_frame.height - bounding.height).abs() < 1.0);
    }

    #[test]
    fn overlay_covers_viewport_when_its_item_is_visible() {
        let contexts = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&contexts);
        let providers = ItemProviders {
            overlay: Some(Arc::new(move |context: &OverlayLayoutContext| {
                captured.lock().unwrap().push(context.clone());
                Some(ItemModel::new(Differentiator::of_kind("tooltip"), json!(null)))
            })),
            ..ItemProviders::default()
        };
        let content = Arc::new(
            CalendarContent::builder(
                Calendar::default(),
                date(2020, 1, 1)..=date(2020, 12, 31),
                vertical(false),
            )
            .providers(providers)
            .overlaid_item_locations([
                OverlaidItemLocation::Day {
                    day: day(2020, 1, 15),
                },
                OverlaidItemLocation::MonthHeader {
                    month: month(2020, 9),
                },
            ])
            .build()
            .unwrap(),
        );
        let mut provider = provider_with(content, Size::new(320.0, 480.0));
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);

        let overlays: Vec<_> = details
            .visible_items
            .iter()
            .filter(|item| matches!(item.item_type(), VisibleItemType::Overlay { .. }))
            .collect();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].frame(), Rect::new(0.0, OFFSET.y, 320.0, 480.0));

        let contexts = contexts.lock().unwrap();
        assert_eq!(contexts.len(), 1);
        assert_eq!(
            contexts[0].available_bounds,
            Rect::new(0.0, 0.0, 320.0, 480.0)
        );
        assert!(contexts[0].overlaid_item_frame.y < 480.0);
    }

    #[test]
    fn month_backgrounds_follow_visible_months() {
        let providers = ItemProviders {
            month_background: Some(Arc::new(|_: Month| {
                Some(ItemModel::new(Differentiator::of_kind("fill"), json!(null)))
            })),
            ..ItemProviders::default()
        };
        let mut provider = provider_with(
            build_content(date(2020, 1, 1)..=date(2020, 12, 31), vertical(false), providers),
            Size::new(320.0, 480.0),
        );
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        let backgrounds =
            count_of(&details, |t| matches!(t, VisibleItemType::MonthBackground { .. }));
        assert_eq!(backgrounds, 2);
    }

    #[test]
    fn declined_optional_decorations_are_omitted() {
        let providers = ItemProviders {
            day_background: Some(Arc::new(|day: Day| {
                (day.day() == 1).then(|| ItemModel::new(Differentiator::of_kind("dot"), json!(null)))
            })),
            ..ItemProviders::default()
        };
        let mut provider = provider_with(
            build_content(date(2020, 1, 1)..=date(2020, 12, 31), vertical(false), providers),
            Size::new(320.0, 480.0),
        );
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        let backgrounds =
            count_of(&details, |t| matches!(t, VisibleItemType::DayBackground { .. }));
        // January 1st and February 1st.
        assert_eq!(backgrounds, 2);
    }
}

// ===== Pinned weekday row =====

mod pinned_days_of_week {
    use super::*;

    fn pinned_provider() -> VisibleItemsProvider {
        provider_with(
            build_content(
                date(2020, 1, 1)..=date(2020, 12, 31),
                vertical(true),
                ItemProviders::default(),
            ),
            Size::new(320.0, 480.0),
        )
    }

    #[test]
    fn pinned_row_replaces_per_month_rows() {
        let mut provider = pinned_provider();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);

        assert_eq!(
            count_of(&details, |t| matches!(t, VisibleItemType::PinnedDayOfWeek { .. })),
            7
        );
        assert_eq!(
            count_of(&details, |t| matches!(
                t,
                VisibleItemType::PinnedDaysOfWeekRowBackground
            )),
            1
        );
        assert_eq!(
            count_of(&details, |t| matches!(
                t,
                VisibleItemType::Layout {
                    item_type: LayoutItemType::DayOfWeekInMonth { .. }
                }
            )),
            0
        );
        assert!((details.height_of_pinned_content - DAY_WIDTH).abs() < EPSILON);
    }

    #[test]
    fn first_month_starts_below_pinned_row() {
        let mut provider = pinned_provider();
        let anchor = provider.initial_anchor_item(OFFSET);
        assert!((anchor.frame.y - (OFFSET.y + DAY_WIDTH)).abs() < EPSILON);

        let details = provider.details_for_visible_items(anchor, OFFSET);
        let minimum = details.minimum_scroll_offset.unwrap();
        assert!((minimum - OFFSET.y).abs() < EPSILON);
    }

    #[test]
    fn pinned_row_follows_viewport() {
        let mut provider = pinned_provider();
        let anchor = provider.initial_anchor_item(OFFSET);
        let first = provider.details_for_visible_items(anchor, OFFSET);
        let scrolled = Point::new(OFFSET.x, OFFSET.y + 333.0);
        let second = provider.details_for_visible_items(first.centermost_layout_item, scrolled);

        let pinned_y = |details: &VisibleItemsDetails| {
            details
                .visible_items
                .iter()
                .find(|item| item.item_type() == VisibleItemType::PinnedDaysOfWeekRowBackground)
                .map(|item| item.frame().y)
                .unwrap()
        };
        assert_eq!(pinned_y(&first), OFFSET.y);
        assert_eq!(pinned_y(&second), OFFSET.y + 333.0);
    }
}

// ===== Model cache =====

mod model_reuse {
    use super::*;

    #[test]
    fn day_models_are_requested_once_while_visible() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let providers = ItemProviders {
            day: Some(Arc::new(move |day: Day| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(DefaultModels::day(day))
            })),
            ..ItemProviders::default()
        };
        let mut provider = provider_with(
            build_content(date(2020, 1, 1)..=date(2020, 12, 31), vertical(false), providers),
            Size::new(320.0, 480.0),
        );
        let anchor = provider.initial_anchor_item(OFFSET);
        let first = provider.details_for_visible_items(anchor, OFFSET);
        let visible_days = first.frames_for_visible_days.len();
        provider.details_for_visible_items(first.centermost_layout_item, OFFSET);

        assert_eq!(calls.load(Ordering::SeqCst), visible_days);
    }

    #[test]
    fn absent_providers_fall_back_to_default_models() {
        let mut provider = year_2020();
        let anchor = provider.initial_anchor_item(OFFSET);
        let details = provider.details_for_visible_items(anchor, OFFSET);
        let header = details
            .visible_items
            .iter()
            .find(|item| {
                item.item_type()
                    == VisibleItemType::Layout {
                        item_type: LayoutItemType::month_header(month(2020, 1)),
                    }
            })
            .unwrap();
        assert_eq!(header.model(), &DefaultModels::month_header(month(2020, 1)));
    }
}

// ===== Horizontal layout =====

mod horizontal {
    use super::*;

    const HORIZONTAL_OFFSET: Point = Point {
        x: 5_000_000.0,
        y: 0.0,
    };

    fn horizontal_provider(visible_months: f64) -> VisibleItemsProvider {
        provider_with(
            build_content(
                date(2020, 1, 1)..=date(2020, 12, 31),
                MonthsLayout::Horizontal(HorizontalMonthsLayoutOptions {
                    maximum_fully_visible_months: visible_months,
                    scrolling_behavior: ScrollingBehavior::FreeScrolling,
                }),
                ItemProviders::default(),
            ),
            Size::new(320.0, 480.0),
        )
    }

    #[test]
    fn partial_next_month_is_visible() {
        let mut provider = horizontal_provider(1.5);
        let anchor = provider.initial_anchor_item(HORIZONTAL_OFFSET);
        let details = provider.details_for_visible_items(anchor, HORIZONTAL_OFFSET);
        assert_eq!(
            details.visible_month_range,
            Some(MonthRange::new(month(2020, 1), month(2020, 2)).unwrap())
        );
        assert_eq!(details.minimum_scroll_offset, Some(HORIZONTAL_OFFSET.x));
    }

    #[test]
    fn single_month_fills_the_width() {
        let mut provider = horizontal_provider(1.0);
        let anchor = provider.initial_anchor_item(HORIZONTAL_OFFSET);
        let details = provider.details_for_visible_items(anchor, HORIZONTAL_OFFSET);
        assert_eq!(
            details.visible_month_range,
            Some(MonthRange::new(month(2020, 1), month(2020, 1)).unwrap())
        );
        assert!(details.max_month_height > 0.0);
    }

    #[test]
    fn last_month_clamps_to_trailing_edge() {
        let provider = horizontal_provider(1.0);
        let anchor = provider.anchor_month_header_item(
            month(2020, 12),
            CalendarScrollPosition::FirstFullyVisiblePosition { padding: 0.0 },
            HORIZONTAL_OFFSET,
        );
        // The 300pt month is pushed right so no space shows after it.
        assert!((anchor.frame.x - (HORIZONTAL_OFFSET.x + 20.0)).abs() < EPSILON);
        assert!((anchor.frame.max_x() - (HORIZONTAL_OFFSET.x + 320.0)).abs() < EPSILON);
    }
}
