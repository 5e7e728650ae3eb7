//! Calendar domain model (pure).
//!
//! Small, comparable value types plus the calendar arithmetic the layout engine
//! consumes. Nothing in here knows about geometry.

pub mod calendar;
pub mod day;
pub mod error;
pub mod month;

// Re-export for convenience
pub use calendar::Calendar;
pub use day::{Day, DayOfWeekPosition, DayRange};
pub use error::{ContentError, RangeError, ScrollError};
pub use month::{Month, MonthRange};
