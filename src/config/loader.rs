//! Configuration file loading with precedence handling.

use chrono::Weekday;
use clap::ValueEnum;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

use crate::model::Calendar;
use crate::view_state::{
    CalendarContent, CalendarContentBuilder, EdgeInsets, HorizontalMonthsLayoutOptions,
    MonthHeaderHeight, MonthsLayout, PageRestingPosition, ScrollingBehavior, SeparatorOptions,
    Size, VerticalMonthsLayoutOptions,
};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CALVIEW_CONFIG";
/// Environment variable overriding the months layout.
pub const MONTHS_LAYOUT_ENV_VAR: &str = "CALVIEW_MONTHS_LAYOUT";
/// Environment variable overriding the log file path.
pub const LOG_FILE_ENV_VAR: &str = "CALVIEW_LOG_FILE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Viewport size or pixel scale the layout engine cannot work with.
    #[error("{setting} must be {expected} (got {value})")]
    InvalidViewport {
        /// Name of the setting.
        setting: &'static str,
        /// What the setting must be.
        expected: &'static str,
        /// Display form of the rejected value.
        value: String,
    },
}

/// Direction months are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Months stacked top to bottom.
    #[default]
    Vertical,
    /// Months side by side.
    Horizontal,
}

/// Scrolling behavior of horizontal layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PagingKind {
    /// Free scrolling.
    #[default]
    None,
    /// Pages rest at the leading edge of each month.
    Month,
    /// Pages are one calendar width wide.
    CalendarWidth,
}

/// Month day insets as written in TOML.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsetsSection {
    /// Space above the first row.
    #[serde(default)]
    pub top: f64,
    /// Space before the first column.
    #[serde(default)]
    pub leading: f64,
    /// Space below the last row.
    #[serde(default)]
    pub bottom: f64,
    /// Space after the last column.
    #[serde(default)]
    pub trailing: f64,
}

impl From<InsetsSection> for EdgeInsets {
    fn from(section: InsetsSection) -> Self {
        EdgeInsets::new(section.top, section.leading, section.bottom, section.trailing)
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/calview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Vertical or horizontal months.
    #[serde(default)]
    pub months_layout: Option<LayoutKind>,

    /// Pin a single weekday row to the top (vertical only).
    #[serde(default)]
    pub pin_days_of_week: Option<bool>,

    /// Show every day of the first and last month (vertical only).
    #[serde(default)]
    pub always_show_complete_boundary_months: Option<bool>,

    /// Months that fit across the calendar width (horizontal only).
    #[serde(default)]
    pub maximum_fully_visible_months: Option<f64>,

    /// Paging for horizontal layouts.
    #[serde(default)]
    pub pagination: Option<PagingKind>,

    /// First day of the week, e.g. "sunday" or "Mon".
    #[serde(default)]
    pub first_weekday: Option<Weekday>,

    /// Viewport width in points.
    #[serde(default)]
    pub width: Option<f64>,

    /// Viewport height in points.
    #[serde(default)]
    pub height: Option<f64>,

    /// Pixels per point.
    #[serde(default)]
    pub scale: Option<f64>,

    /// Padding between a month's edges and its weekday and day cells.
    #[serde(default)]
    pub month_day_insets: Option<InsetsSection>,

    /// Gap between consecutive months.
    #[serde(default)]
    pub inter_month_spacing: Option<f64>,

    /// Gap between rows of days.
    #[serde(default)]
    pub vertical_day_margin: Option<f64>,

    /// Gap between columns of days.
    #[serde(default)]
    pub horizontal_day_margin: Option<f64>,

    /// Day height divided by day width, in `0..=3`.
    #[serde(default)]
    pub day_aspect_ratio: Option<f64>,

    /// Weekday cell height divided by its width, in `0..=3`.
    #[serde(default)]
    pub day_of_week_aspect_ratio: Option<f64>,

    /// Height of every month header.
    #[serde(default)]
    pub month_header_height: Option<f64>,

    /// Height of the separator under weekday rows; absent means no separator.
    #[serde(default)]
    pub days_of_week_separator_height: Option<f64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Vertical or horizontal months.
    pub months_layout: LayoutKind,
    /// Pin a single weekday row to the top (vertical only).
    pub pin_days_of_week: bool,
    /// Show every day of the first and last month (vertical only).
    pub always_show_complete_boundary_months: bool,
    /// Months that fit across the calendar width (horizontal only).
    pub maximum_fully_visible_months: f64,
    /// Paging for horizontal layouts.
    pub pagination: PagingKind,
    /// First day of the week.
    pub first_weekday: Weekday,
    /// Viewport width in points.
    pub width: f64,
    /// Viewport height in points.
    pub height: f64,
    /// Pixels per point.
    pub scale: f64,
    /// Padding between a month's edges and its cells.
    pub month_day_insets: EdgeInsets,
    /// Gap between consecutive months.
    pub inter_month_spacing: f64,
    /// Gap between rows of days.
    pub vertical_day_margin: f64,
    /// Gap between columns of days.
    pub horizontal_day_margin: f64,
    /// Day height divided by day width.
    pub day_aspect_ratio: f64,
    /// Weekday cell height divided by its width.
    pub day_of_week_aspect_ratio: f64,
    /// Height of every month header.
    pub month_header_height: f64,
    /// Height of the separator under weekday rows, if any.
    pub days_of_week_separator_height: Option<f64>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            months_layout: LayoutKind::Vertical,
            pin_days_of_week: false,
            always_show_complete_boundary_months: false,
            maximum_fully_visible_months: 1.0,
            pagination: PagingKind::None,
            first_weekday: Weekday::Sun,
            width: 320.0,
            height: 480.0,
            scale: 2.0,
            month_day_insets: EdgeInsets::ZERO,
            inter_month_spacing: 0.0,
            vertical_day_margin: 0.0,
            horizontal_day_margin: 0.0,
            day_aspect_ratio: 1.0,
            day_of_week_aspect_ratio: 1.0,
            month_header_height: 44.0,
            days_of_week_separator_height: None,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Viewport size in points.
    pub fn viewport_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Reject a viewport the layout engine would treat as a contract violation.
    pub fn validate_viewport(&self) -> Result<(), ConfigError> {
        let checks = [
            ("width", self.width, self.width.is_finite() && self.width >= 0.0),
            ("height", self.height, self.height.is_finite() && self.height >= 0.0),
        ];
        for (setting, value, valid) in checks {
            if !valid {
                return Err(ConfigError::InvalidViewport {
                    setting,
                    expected: "a finite, non-negative length",
                    value: value.to_string(),
                });
            }
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidViewport {
                setting: "scale",
                expected: "positive and finite",
                value: self.scale.to_string(),
            });
        }
        Ok(())
    }

    /// Calendar starting weeks on the configured weekday.
    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.first_weekday)
    }

    /// Months layout assembled from the layout, pinning and paging settings.
    pub fn months_layout(&self) -> MonthsLayout {
        match self.months_layout {
            LayoutKind::Vertical => MonthsLayout::Vertical(VerticalMonthsLayoutOptions {
                pin_days_of_week_to_top: self.pin_days_of_week,
                always_show_complete_boundary_months: self.always_show_complete_boundary_months,
            }),
            LayoutKind::Horizontal => MonthsLayout::Horizontal(HorizontalMonthsLayoutOptions {
                maximum_fully_visible_months: self.maximum_fully_visible_months,
                scrolling_behavior: match self.pagination {
                    PagingKind::None => ScrollingBehavior::FreeScrolling,
                    PagingKind::Month => {
                        ScrollingBehavior::Paginated(PageRestingPosition::AtLeadingEdgeOfEachMonth)
                    }
                    PagingKind::CalendarWidth => ScrollingBehavior::Paginated(
                        PageRestingPosition::AtIncrementsOfCalendarWidth,
                    ),
                },
            }),
        }
    }

    /// Content builder carrying every layout setting. Validation happens in
    /// `CalendarContentBuilder::build`.
    pub fn content_builder(
        &self,
        visible_date_range: RangeInclusive<chrono::NaiveDate>,
    ) -> CalendarContentBuilder {
        CalendarContent::builder(self.calendar(), visible_date_range, self.months_layout())
            .month_day_insets(self.month_day_insets)
            .inter_month_spacing(self.inter_month_spacing)
            .vertical_day_margin(self.vertical_day_margin)
            .horizontal_day_margin(self.horizontal_day_margin)
            .day_aspect_ratio(self.day_aspect_ratio)
            .day_of_week_aspect_ratio(self.day_of_week_aspect_ratio)
            .month_header_height(MonthHeaderHeight::Fixed(self.month_header_height))
            .days_of_week_row_separator(
                self.days_of_week_separator_height
                    .map(|height| SeparatorOptions { height }),
            )
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/calview/calview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("calview").join("calview.log")
    } else {
        PathBuf::from("calview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/calview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("calview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CALVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/calview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CALVIEW_MONTHS_LAYOUT`: `vertical` or `horizontal` (unrecognized values are ignored)
/// - `CALVIEW_LOG_FILE`: log file path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(value) = std::env::var(MONTHS_LAYOUT_ENV_VAR) {
        match LayoutKind::from_str(&value, true) {
            Ok(layout) => config.months_layout = layout,
            Err(_) => warn!(%value, "ignoring unrecognized {MONTHS_LAYOUT_ENV_VAR}"),
        }
    }

    if let Ok(path) = std::env::var(LOG_FILE_ENV_VAR) {
        if !path.is_empty() {
            config.log_file_path = PathBuf::from(path);
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        months_layout: config.months_layout.unwrap_or(defaults.months_layout),
        pin_days_of_week: config.pin_days_of_week.unwrap_or(defaults.pin_days_of_week),
        always_show_complete_boundary_months: config
            .always_show_complete_boundary_months
            .unwrap_or(defaults.always_show_complete_boundary_months),
        maximum_fully_visible_months: config
            .maximum_fully_visible_months
            .unwrap_or(defaults.maximum_fully_visible_months),
        pagination: config.pagination.unwrap_or(defaults.pagination),
        first_weekday: config.first_weekday.unwrap_or(defaults.first_weekday),
        width: config.width.unwrap_or(defaults.width),
        height: config.height.unwrap_or(defaults.height),
        scale: config.scale.unwrap_or(defaults.scale),
        month_day_insets: config
            .month_day_insets
            .map_or(defaults.month_day_insets, EdgeInsets::from),
        inter_month_spacing: config
            .inter_month_spacing
            .unwrap_or(defaults.inter_month_spacing),
        vertical_day_margin: config
            .vertical_day_margin
            .unwrap_or(defaults.vertical_day_margin),
        horizontal_day_margin: config
            .horizontal_day_margin
            .unwrap_or(defaults.horizontal_day_margin),
        day_aspect_ratio: config.day_aspect_ratio.unwrap_or(defaults.day_aspect_ratio),
        day_of_week_aspect_ratio: config
            .day_of_week_aspect_ratio
            .unwrap_or(defaults.day_of_week_aspect_ratio),
        month_header_height: config
            .month_header_height
            .unwrap_or(defaults.month_header_height),
        days_of_week_separator_height: config
            .days_of_week_separator_height
            .or(defaults.days_of_week_separator_height),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// CLI flags that override resolved settings. `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--layout`
    pub months_layout: Option<LayoutKind>,
    /// `--pin-days-of-week`
    pub pin_days_of_week: Option<bool>,
    /// `--pagination`
    pub pagination: Option<PagingKind>,
    /// `--visible-months`
    pub maximum_fully_visible_months: Option<f64>,
    /// `--width`
    pub width: Option<f64>,
    /// `--height`
    pub height: Option<f64>,
    /// `--scale`
    pub scale: Option<f64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(layout) = overrides.months_layout {
        config.months_layout = layout;
    }
    if let Some(pin) = overrides.pin_days_of_week {
        config.pin_days_of_week = pin;
    }
    if let Some(pagination) = overrides.pagination {
        config.pagination = pagination;
    }
    if let Some(months) = overrides.maximum_fully_visible_months {
        config.maximum_fully_visible_months = months;
    }
    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    if let Some(scale) = overrides.scale {
        config.scale = scale;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
