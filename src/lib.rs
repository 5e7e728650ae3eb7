//! Virtualized calendar layout engine (calview)
//!
//! Lays out months and days for a (possibly huge) date range while only ever
//! materializing what intersects the viewport. Views are recycled between
//! layout passes, and the scroll space loops so coordinates stay small.
//!
//! The core is split the same way as the layers below: a pure calendar
//! model, a pure view-state engine, and a thin headless controller that a host
//! UI (or the `calview` binary) drives.

pub mod calendar_view;
pub mod config;
pub mod logging;
pub mod model;
pub mod view_state;
