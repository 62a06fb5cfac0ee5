use thiserror::Error;

use crate::core::{EntryId, PlotId};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("entry {0:?} is not on this plot")]
    EntryNotOnPlot(EntryId),

    #[error("manual scale requires finite min < max, got min={min}, max={max}")]
    InvalidManualScale { min: f64, max: f64 },

    #[error("too many baselines: {count} (max {max})")]
    TooManyBaselines { count: usize, max: usize },

    #[error("unknown plot {0:?}")]
    UnknownPlot(PlotId),
}
