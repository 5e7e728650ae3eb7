//! calview - Entry Point
//!
//! Lays out a date range in a virtual viewport and prints what would be on
//! screen, pass by pass.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use calview::calendar_view::{CalendarLayout, CalendarView};
use calview::config::{self, CliOverrides, ConfigError, LayoutKind, PagingKind};
use calview::logging::LoggingError;
use calview::model::{ContentError, Day, DayRange, Month, MonthRange, ScrollError};
use calview::view_state::{
    CalendarScrollPosition, Differentiator, ItemModel, Rect, ReuseKind, ReuseStats, ScrollTarget,
    ViewFactory, VisibleItemType,
};

/// calview - inspect virtualized calendar layouts
#[derive(Parser, Debug)]
#[command(name = "calview")]
#[command(version)]
#[command(about = "Lay out a calendar in a virtual viewport and print the visible items")]
pub struct Args {
    /// First date in the calendar (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last date in the calendar (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Viewport width in points
    #[arg(long)]
    pub width: Option<f64>,

    /// Viewport height in points
    #[arg(long)]
    pub height: Option<f64>,

    /// Pixels per point
    #[arg(long)]
    pub scale: Option<f64>,

    /// Months layout direction
    #[arg(long, value_enum)]
    pub layout: Option<LayoutKind>,

    /// Pin one weekday row to the top of the viewport (vertical layout)
    #[arg(long)]
    pub pin_days_of_week: bool,

    /// Paging for horizontal layouts
    #[arg(long, value_enum)]
    pub pagination: Option<PagingKind>,

    /// Months that fit across the width (horizontal layout)
    #[arg(long)]
    pub visible_months: Option<f64>,

    /// Month (YYYY-MM) or day (YYYY-MM-DD) to scroll to before the first pass
    #[arg(long, value_parser = parse_scroll_target)]
    pub scroll_to: Option<ScrollTarget>,

    /// Where the scroll-to target comes to rest
    #[arg(long, value_enum, default_value = "centered")]
    pub position: PositionArg,

    /// Padding for first/last fully visible positions
    #[arg(long, default_value = "0")]
    pub padding: f64,

    /// Scroll by this many points and lay out again (repeatable)
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_by: Vec<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Resting position for `--scroll-to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    /// Center the target in the viewport.
    Centered,
    /// Place the target at the first fully visible position.
    First,
    /// Place the target at the last fully visible position.
    Last,
}

impl PositionArg {
    fn with_padding(self, padding: f64) -> CalendarScrollPosition {
        match self {
            Self::Centered => CalendarScrollPosition::Centered,
            Self::First => CalendarScrollPosition::FirstFullyVisiblePosition { padding },
            Self::Last => CalendarScrollPosition::LastFullyVisiblePosition { padding },
        }
    }
}

/// How each pass is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per visible item.
    Table,
    /// One JSON document per pass.
    Json,
}

/// Accepts `YYYY-MM-DD` (a day) or `YYYY-MM` (a month).
fn parse_scroll_target(value: &str) -> Result<ScrollTarget, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(ScrollTarget::Day {
            day: Day::containing(date),
        });
    }
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|date| ScrollTarget::Month {
            month: Month::containing(date),
        })
        .map_err(|_| format!("expected YYYY-MM or YYYY-MM-DD, got {value:?}"))
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Log file could not be set up.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Settings produced invalid calendar content.
    #[error("Invalid calendar content: {0}")]
    Content(#[from] ContentError),

    /// `--scroll-to` named an item outside the range.
    #[error(transparent)]
    Scroll(#[from] ScrollError),

    /// A report could not be serialized.
    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Views are plain ids; the CLI only cares how they are reused.
#[derive(Debug, Default)]
struct ViewIds {
    next: usize,
}

impl ViewFactory for ViewIds {
    type View = usize;

    fn make_view(&mut self, _differentiator: &Differentiator) -> usize {
        self.next += 1;
        self.next
    }

    fn update_content(&mut self, _view: &usize, _model: &ItemModel) {}
}

#[derive(Debug, Serialize)]
struct ItemReport {
    item: VisibleItemType,
    /// Frame relative to the viewport origin.
    frame: Rect,
    view: usize,
    reuse: ReuseKind,
}

#[derive(Debug, Serialize)]
struct PassReport {
    pass: usize,
    scrolled_by: f64,
    visible_month_range: Option<MonthRange>,
    visible_day_range: Option<DayRange>,
    minimum_scroll_offset: Option<f64>,
    maximum_scroll_offset: Option<f64>,
    retained: usize,
    recycled: usize,
    created: usize,
    items: Vec<ItemReport>,
}

impl PassReport {
    fn new(
        pass: usize,
        scrolled_by: f64,
        offset: (f64, f64),
        layout: CalendarLayout<usize>,
        stats: ReuseStats,
    ) -> Self {
        let (offset_x, offset_y) = offset;
        // The cross-axis offset is always 0.
        let axis_offset = offset_x + offset_y;
        let relative = |value: Option<f64>| value.map(|value| value - axis_offset);
        Self {
            pass,
            scrolled_by,
            visible_month_range: layout.details.visible_month_range,
            visible_day_range: layout.details.visible_day_range,
            minimum_scroll_offset: relative(layout.details.minimum_scroll_offset),
            maximum_scroll_offset: relative(layout.details.maximum_scroll_offset),
            retained: stats.retained,
            recycled: stats.recycled,
            created: stats.created,
            items: layout
                .assignments
                .into_iter()
                .map(|assignment| ItemReport {
                    item: assignment.item.item_type(),
                    frame: assignment.item.frame().offset_by(-offset_x, -offset_y),
                    view: assignment.view,
                    reuse: assignment.reuse,
                })
                .collect(),
        }
    }

    fn write_table(&self, out: &mut impl Write) -> io::Result<()> {
        let range = |range: Option<String>| range.unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "pass {} (scrolled {:+}): months {}, days {}, views {} retained / {} recycled / {} created",
            self.pass,
            self.scrolled_by,
            range(self.visible_month_range.map(|r| r.to_string())),
            range(self.visible_day_range.map(|r| r.to_string())),
            self.retained,
            self.recycled,
            self.created,
        )?;
        for item in &self.items {
            writeln!(
                out,
                "  {:<40} {:>9.2} {:>9.2} {:>8.2} {:>8.2}  view {:<4} {:?}",
                item.item.to_string(),
                item.frame.x,
                item.frame.y,
                item.frame.width,
                item.frame.height,
                item.view,
                item.reuse,
            )?;
        }
        Ok(())
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(
            with_env,
            CliOverrides {
                months_layout: args.layout,
                pin_days_of_week: args.pin_days_of_week.then_some(true),
                pagination: args.pagination,
                maximum_fully_visible_months: args.visible_months,
                width: args.width,
                height: args.height,
                scale: args.scale,
            },
        )
    };

    calview::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    config.validate_viewport()?;
    let content = config.content_builder(args.start..=args.end).build()?;
    let mut view = CalendarView::new(content, config.viewport_size(), ViewIds::default());
    view.set_viewport(
        config.viewport_size(),
        calview::view_state::EdgeInsets::ZERO,
        config.scale,
    );

    if let Some(target) = args.scroll_to {
        let position = args.position.with_padding(args.padding);
        match target {
            ScrollTarget::Month { month } => view.scroll_to_month(month, position)?,
            ScrollTarget::Day { day } => view.scroll_to_day(day, position)?,
        }
    }

    let mut reports = Vec::with_capacity(args.scroll_by.len() + 1);
    let layout = view.layout();
    let offset = view.offset();
    reports.push(PassReport::new(
        0,
        0.0,
        (offset.x, offset.y),
        layout,
        view.reuse_manager().last_stats(),
    ));
    for (index, delta) in args.scroll_by.iter().enumerate() {
        let scrolled_by = view.scroll_by(*delta);
        let layout = view.layout();
        let offset = view.offset();
        reports.push(PassReport::new(
            index + 1,
            scrolled_by,
            (offset.x, offset.y),
            layout,
            view.reuse_manager().last_stats(),
        ));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            for report in &reports {
                report.write_table(&mut out)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    run(Args::parse())
}
