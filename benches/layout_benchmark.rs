//! Layout pass benchmarks.
//!
//! A pass should cost the same whether the calendar spans one year or a
//! thousand, since only the items intersecting the viewport are visited.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use calview::calendar_view::CalendarView;
use calview::model::{Calendar, Month};
use calview::view_state::{
    CalendarContent, CalendarScrollPosition, Differentiator, HorizontalMonthsLayoutOptions,
    ItemModel, MonthsLayout, Size, ViewFactory,
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

#[derive(Debug, Default)]
struct NullFactory {
    created: usize,
}

impl ViewFactory for NullFactory {
    type View = usize;

    fn make_view(&mut self, _differentiator: &Differentiator) -> usize {
        self.created += 1;
        self.created
    }

    fn update_content(&mut self, _view: &usize, _model: &ItemModel) {}
}

const VIEWPORT: Size = Size {
    width: 390.0,
    height: 844.0,
};

fn content_spanning(years: i32, layout: MonthsLayout) -> CalendarContent {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2000 + years - 1, 12, 31).unwrap();
    CalendarContent::builder(Calendar::default(), start..=end, layout)
        .build()
        .unwrap()
}

/// Laid-out view resting in the middle of the range.
fn view_in_the_middle(years: i32, layout: MonthsLayout) -> CalendarView<NullFactory> {
    let mut view = CalendarView::new(content_spanning(years, layout), VIEWPORT, NullFactory::default());
    view.layout();
    let middle = Month::new(2000 + years / 2, 6).unwrap();
    // The range always contains the middle month.
    let _ = view.scroll_to_month(middle, CalendarScrollPosition::Centered);
    view.layout();
    view
}

/// One pass after a small scroll, for increasingly large ranges.
fn benchmark_scroll_pass_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_pass");

    for years in [1, 100, 1_000] {
        group.bench_with_input(BenchmarkId::new("vertical", years), &years, |b, &years| {
            b.iter_batched(
                || view_in_the_middle(years, MonthsLayout::default()),
                |mut view| {
                    view.scroll_by(black_box(37.0));
                    view.layout()
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("horizontal", years), &years, |b, &years| {
            b.iter_batched(
                || {
                    view_in_the_middle(
                        years,
                        MonthsLayout::Horizontal(HorizontalMonthsLayoutOptions::default()),
                    )
                },
                |mut view| {
                    view.scroll_by(black_box(37.0));
                    view.layout()
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// A fling: many consecutive passes on one view, exercising recycling.
fn benchmark_fling(c: &mut Criterion) {
    let mut group = c.benchmark_group("fling");

    for (name, delta) in [("slow", 4.0), ("fast", 120.0)] {
        group.bench_with_input(BenchmarkId::new("sixty_passes", name), &delta, |b, &delta| {
            b.iter_batched(
                || view_in_the_middle(100, MonthsLayout::default()),
                |mut view| {
                    for _ in 0..60 {
                        view.scroll_by(black_box(delta));
                        black_box(view.layout());
                    }
                    view
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Programmatic scroll across the range; anchor placement plus one pass.
fn benchmark_scroll_to(c: &mut Criterion) {
    let mut view = view_in_the_middle(1_000, MonthsLayout::default());
    let targets = [
        Month::new(2000, 1).unwrap(),
        Month::new(2500, 6).unwrap(),
        Month::new(2999, 12).unwrap(),
    ];

    c.bench_function("scroll_to_month", |b| {
        let mut index = 0;
        b.iter(|| {
            let target = targets[index % targets.len()];
            index += 1;
            let _ = view.scroll_to_month(
                black_box(target),
                CalendarScrollPosition::FirstFullyVisiblePosition { padding: 0.0 },
            );
            view.layout()
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(5));
    targets = benchmark_scroll_pass_scaling, benchmark_fling, benchmark_scroll_to
}

criterion_main!(benches);
