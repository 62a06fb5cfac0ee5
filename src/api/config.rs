use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// Most entries one plot can hold.
pub const MAX_ENTRIES_PER_PLOT: usize = 10;

/// Most horizontal baselines one plot can carry.
pub const MAX_BASELINES: usize = 6;

pub type Baselines = SmallVec<[f64; MAX_BASELINES]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphType {
    /// Every entry against the time index.
    #[default]
    Time,
    /// Consecutive entry pairs plotted against each other.
    Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleType {
    /// Shared range reduced over all entries.
    #[default]
    Auto,
    /// Each entry against its own range.
    Individual,
    /// Operator-supplied fixed range; data ignored.
    Manual,
}

/// Per-plot presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub graph_type: GraphType,
    pub scale_type: ScaleType,
    pub manual_min: f64,
    pub manual_max: f64,
    #[serde(default)]
    pub show_baselines: bool,
    #[serde(default)]
    pub show_baselines_info: bool,
    #[serde(default)]
    pub show_namespaces: bool,
    #[serde(default)]
    pub baselines: Baselines,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            graph_type: GraphType::Time,
            scale_type: ScaleType::Auto,
            manual_min: 0.0,
            manual_max: 0.0,
            show_baselines: false,
            show_baselines_info: false,
            show_namespaces: false,
            baselines: Baselines::new(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn with_graph_type(mut self, graph_type: GraphType) -> Self {
        self.graph_type = graph_type;
        self
    }

    #[must_use]
    pub fn with_scale_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    /// Switches to MANUAL scaling over `[min, max]`.
    #[must_use]
    pub fn with_manual_range(mut self, min: f64, max: f64) -> Self {
        self.scale_type = ScaleType::Manual;
        self.manual_min = min;
        self.manual_max = max;
        self
    }

    #[must_use]
    pub fn with_baselines(mut self, baselines: impl IntoIterator<Item = f64>) -> Self {
        self.baselines = baselines.into_iter().collect();
        self.show_baselines = true;
        self
    }

    #[must_use]
    pub fn with_show_namespaces(mut self, show: bool) -> Self {
        self.show_namespaces = show;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.scale_type == ScaleType::Manual {
            validate_manual_range(self.manual_min, self.manual_max)?;
        }
        if self.baselines.len() > MAX_BASELINES {
            return Err(ChartError::TooManyBaselines {
                count: self.baselines.len(),
                max: MAX_BASELINES,
            });
        }
        if self.baselines.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "baselines must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolves an out-of-range baseline slot to slot 0; `None` without
    /// baselines.
    #[must_use]
    pub fn baseline_slot(&self, slot: usize) -> Option<usize> {
        if self.baselines.is_empty() {
            None
        } else if slot < self.baselines.len() {
            Some(slot)
        } else {
            Some(0)
        }
    }

    #[must_use]
    pub fn baseline_average(&self) -> Option<f64> {
        if self.baselines.is_empty() {
            return None;
        }
        Some(self.baselines.iter().sum::<f64>() / self.baselines.len() as f64)
    }
}

pub(crate) fn validate_manual_range(min: f64, max: f64) -> ChartResult<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(ChartError::InvalidManualScale { min, max });
    }
    Ok(())
}
