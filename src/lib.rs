//! scrub-chart: headless plotting core for scrubbing through telemetry.
//!
//! A group of plots shares one playback cursor and one visible index window
//! over a time-series buffer. Input only records intent; once per frame the
//! host commits it and each plot redraws just the layers and index ranges
//! that went stale, emitted as backend-agnostic render frames.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FlushReport, PlotConfig, PlotController, PlotGroup};
pub use error::{ChartError, ChartResult};
