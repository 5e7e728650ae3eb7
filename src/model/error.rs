//! Error types for the calendar layout engine.
//!
//! Errors here are the recoverable kind: bad input handed to a constructor or
//! builder. Contract violations inside a layout pass (non-adjacent days passed to
//! the incremental frame computation, a month origin that cannot be chained, a
//! recycled view with the wrong differentiator) are not represented here; they
//! panic with a message naming the broken invariant.
//!
//! # Error Hierarchy
//!
//! - [`RangeError`] - Month/day range construction failures
//! - [`ContentError`] - Invalid calendar content configuration
//! - [`ScrollError`] - Programmatic scroll to something that is not laid out

use thiserror::Error;

/// Failure constructing a closed range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The lower bound sorts after the upper bound.
    #[error("Range lower bound {lower} is after upper bound {upper}")]
    Inverted {
        /// Display form of the lower bound.
        lower: String,
        /// Display form of the upper bound.
        upper: String,
    },
}

/// Invalid calendar content configuration.
///
/// Returned by `CalendarContentBuilder::build`. Every variant names the
/// offending setting so the message can be shown directly to a user editing a
/// config file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// The visible date range is inverted.
    #[error("Invalid visible date range: {0}")]
    DateRange(#[from] RangeError),

    /// An aspect ratio is outside the supported interval.
    #[error("{setting} must be between {min} and {max} (got {value})")]
    AspectRatioOutOfRange {
        /// Name of the setting.
        setting: &'static str,
        /// Rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// A spacing or margin is negative or not finite.
    #[error("{setting} must be a finite, non-negative length (got {value})")]
    InvalidLength {
        /// Name of the setting.
        setting: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Horizontal layouts need at least one fully visible month.
    #[error("maximum_fully_visible_months must be >= 1 (got {0})")]
    FullyVisibleMonths(f64),
}

/// A programmatic scroll request that cannot be honored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrollError {
    /// The target month or day is outside the laid-out range.
    #[error("Cannot scroll to {target}: outside the visible date range")]
    TargetOutOfRange {
        /// Display form of the requested target.
        target: String,
    },
}
