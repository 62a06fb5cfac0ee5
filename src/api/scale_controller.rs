use tracing::trace;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::config::validate_manual_range;
use super::{GraphType, PlotConfig, PlotController, ScaleType};

/// Fraction of the plot range one baseline nudge moves.
const BASELINE_STEP_FRACTION: f64 = 0.01;

impl<R: Renderer> PlotController<R> {
    /// Replaces the whole configuration; validated before anything changes.
    pub fn set_config(&mut self, config: PlotConfig) -> ChartResult<()> {
        config.validate()?;
        self.inbox
            .set_phase_plot(config.graph_type == GraphType::Phase);
        self.config = config;
        self.request_full_repaint(true);
        self.inbox.mark_index_overlay();
        Ok(())
    }

    pub fn set_graph_type(&mut self, graph_type: GraphType) {
        if self.config.graph_type == graph_type {
            return;
        }
        self.config.graph_type = graph_type;
        self.inbox.set_phase_plot(graph_type == GraphType::Phase);
        self.request_full_repaint(true);
        self.inbox.mark_index_overlay();
    }

    /// Switching to MANUAL requires a usable manual range already set.
    pub fn set_scale_type(&mut self, scale_type: ScaleType) -> ChartResult<()> {
        if scale_type == ScaleType::Manual {
            validate_manual_range(self.config.manual_min, self.config.manual_max)?;
        }
        self.config.scale_type = scale_type;
        self.request_full_repaint(true);
        Ok(())
    }

    /// Sets the manual range and switches the plot to MANUAL scaling.
    pub fn set_manual_range(&mut self, min: f64, max: f64) -> ChartResult<()> {
        validate_manual_range(min, max)?;
        self.config.manual_min = min;
        self.config.manual_max = max;
        self.config.scale_type = ScaleType::Manual;
        self.request_full_repaint(true);
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = viewport;
        self.request_full_repaint(false);
        self.inbox.mark_index_overlay();
        Ok(())
    }

    pub fn set_show_namespaces(&mut self, show: bool) {
        if self.config.show_namespaces != show {
            self.config.show_namespaces = show;
            // label widths feed the bottom margin the data is drawn above
            self.request_full_repaint(false);
            self.inbox.mark_index_overlay();
        }
    }

    pub fn set_show_baselines_info(&mut self, show: bool) {
        if self.config.show_baselines_info != show {
            self.config.show_baselines_info = show;
            self.inbox.mark_label_overlay();
        }
    }

    pub fn set_show_baselines(&mut self, show: bool) {
        if self.config.show_baselines != show {
            self.config.show_baselines = show;
            self.request_full_repaint(false);
        }
    }

    pub fn set_baselines(&mut self, baselines: impl IntoIterator<Item = f64>) -> ChartResult<()> {
        let mut config = self.config.clone();
        config.baselines = baselines.into_iter().collect();
        config.validate()?;
        self.config = config;
        self.baselines_changed();
        Ok(())
    }

    #[must_use]
    pub fn baselines(&self) -> &[f64] {
        &self.config.baselines
    }

    /// Range baseline nudges and centering are relative to.
    #[must_use]
    pub fn plot_range(&self) -> (f64, f64) {
        match self.config.scale_type {
            ScaleType::Manual => (self.config.manual_min, self.config.manual_max),
            ScaleType::Auto | ScaleType::Individual => self.aggregate.unwrap_or((0.0, 0.0)),
        }
    }

    /// Moves baseline `slot` by `scale` percent of the plot range.
    pub fn increment_baseline(&mut self, slot: usize, scale: f64) {
        let Some(slot) = self.config.baseline_slot(slot) else {
            trace!(slot, "no baselines to increment");
            return;
        };
        let (min, max) = self.plot_range();
        self.config.baselines[slot] += BASELINE_STEP_FRACTION * (max - min) * scale;
        self.baselines_changed();
    }

    pub fn zero_baseline(&mut self, slot: usize) {
        self.set_baseline_value(slot, 0.0);
    }

    pub fn center_baseline(&mut self, slot: usize) {
        let (min, max) = self.plot_range();
        self.set_baseline_value(slot, (min + max) / 2.0);
    }

    fn set_baseline_value(&mut self, slot: usize, value: f64) {
        if let Some(slot) = self.config.baseline_slot(slot) {
            self.config.baselines[slot] = value;
            self.baselines_changed();
        }
    }

    fn baselines_changed(&self) {
        if self.config.show_baselines {
            self.request_full_repaint(false);
        }
        self.inbox.mark_label_overlay();
    }
}
