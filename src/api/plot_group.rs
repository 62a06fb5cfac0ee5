use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::window::ListenerRegistry;
use crate::core::{
    BufferFacade, EntryId, IndexWindowModel, ListenerId, PlotId, SeriesSource, SharedIndexWindow,
    Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{FlushReport, PlotConfig, PlotController};

pub type DeletionListener = Arc<dyn Fn(PlotId) + Send + Sync>;

/// Outcome of one [`PlotGroup::frame`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupFrameReport {
    /// Pending tick or index intent was committed to the buffer.
    pub committed: bool,
    pub plots: Vec<(PlotId, FlushReport)>,
    /// Plots whose flush failed, with the error text. Their work is
    /// re-queued and the remaining plots still flush.
    pub failed: Vec<(PlotId, String)>,
}

/// Plots sharing one cursor and one visible window.
///
/// The group owns the frame loop contract: [`PlotGroup::frame`] commits the
/// pending intent once and then flushes every plot.
pub struct PlotGroup<R: Renderer> {
    window: Arc<dyn IndexWindowModel>,
    plots: IndexMap<PlotId, PlotController<R>>,
    next_plot_id: u32,
    deletion_listeners: Mutex<ListenerRegistry<dyn Fn(PlotId) + Send + Sync>>,
}

impl<R: Renderer> PlotGroup<R> {
    #[must_use]
    pub fn new(window: Arc<dyn IndexWindowModel>) -> Self {
        Self {
            window,
            plots: IndexMap::new(),
            next_plot_id: 0,
            deletion_listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    /// Group driven by a [`SharedIndexWindow`] over `buffer`.
    #[must_use]
    pub fn for_buffer(buffer: Arc<dyn BufferFacade>) -> Self {
        Self::new(Arc::new(SharedIndexWindow::new(buffer)))
    }

    #[must_use]
    pub fn window(&self) -> &Arc<dyn IndexWindowModel> {
        &self.window
    }

    pub fn add_plot(&mut self, renderer: R, viewport: Viewport) -> ChartResult<PlotId> {
        self.add_plot_with_config(renderer, viewport, PlotConfig::default())
    }

    pub fn add_plot_with_config(
        &mut self,
        renderer: R,
        viewport: Viewport,
        config: PlotConfig,
    ) -> ChartResult<PlotId> {
        let plot =
            PlotController::with_config(renderer, Arc::clone(&self.window), viewport, config)?;
        let id = PlotId::new(self.next_plot_id);
        self.next_plot_id += 1;
        self.plots.insert(id, plot);
        debug!(plot = id.raw(), plots = self.plots.len(), "plot added");
        Ok(id)
    }

    /// Creates a plot showing `sources`. The first source is required;
    /// later ones the plot cannot take are skipped.
    pub fn setup_plot(
        &mut self,
        renderer: R,
        viewport: Viewport,
        config: PlotConfig,
        sources: impl IntoIterator<Item = Arc<dyn SeriesSource>>,
    ) -> ChartResult<PlotId> {
        let mut sources = sources.into_iter();
        let first = sources.next().ok_or_else(|| {
            ChartError::InvalidData("a plot needs at least one series".to_owned())
        })?;

        let id = self.add_plot_with_config(renderer, viewport, config)?;
        let plot = self.plot_mut(id)?;
        plot.add_entry(first);
        for source in sources {
            let entry = source.id();
            if !plot.add_entry(source) {
                trace!(plot = id.raw(), entry = entry.raw(), "series skipped during setup");
            }
        }
        Ok(id)
    }

    /// Detaches the plot from the shared window and hands it back.
    pub fn remove_plot(&mut self, id: PlotId) -> ChartResult<PlotController<R>> {
        let plot = self
            .plots
            .shift_remove(&id)
            .ok_or(ChartError::UnknownPlot(id))?;
        debug!(plot = id.raw(), plots = self.plots.len(), "plot removed");
        Ok(plot)
    }

    pub fn clear(&mut self) {
        self.plots.clear();
    }

    pub fn plot(&self, id: PlotId) -> ChartResult<&PlotController<R>> {
        self.plots.get(&id).ok_or(ChartError::UnknownPlot(id))
    }

    pub fn plot_mut(&mut self, id: PlotId) -> ChartResult<&mut PlotController<R>> {
        self.plots.get_mut(&id).ok_or(ChartError::UnknownPlot(id))
    }

    #[must_use]
    pub fn plot_ids(&self) -> Vec<PlotId> {
        self.plots.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    /// Runs one frame: commits pending intent, then flushes each plot in
    /// insertion order. A failing plot is reported and skipped.
    pub fn frame(&mut self) -> GroupFrameReport {
        let committed = self.window.apply_pending();
        let mut plots = Vec::with_capacity(self.plots.len());
        let mut failed = Vec::new();
        for (id, plot) in &mut self.plots {
            match plot.flush() {
                Ok(report) => plots.push((*id, report)),
                Err(error) => {
                    warn!(plot = id.raw(), error = %error, "plot skipped this frame");
                    failed.push((*id, error.to_string()));
                }
            }
        }
        GroupFrameReport {
            committed,
            plots,
            failed,
        }
    }

    pub fn on_buffer_size_changed(&self) {
        self.window.on_buffer_size_changed();
        for plot in self.plots.values() {
            plot.on_buffer_changed();
        }
    }

    pub fn on_index_changed(&self) {
        self.window.notify_index_listeners();
    }

    pub fn on_manual_end_points_changed(&self) {
        for plot in self.plots.values() {
            plot.on_manual_end_points_changed();
        }
    }

    /// Data written for `entry` at `at`; every plot showing it is marked.
    pub fn on_entry_data_changed(&self, entry: EntryId, at: i64) {
        for plot in self.plots.values() {
            plot.on_entry_data_changed(entry, at);
        }
    }

    pub fn zoom_in(&self, factor: i64) -> ChartResult<()> {
        self.window.zoom_in(factor)
    }

    pub fn zoom_out(&self, factor: i64) -> ChartResult<()> {
        self.window.zoom_out(factor)
    }

    pub fn zoom_full_view(&self) {
        self.window.zoom_full_view();
    }

    pub fn recenter(&self) -> ChartResult<()> {
        self.window.recenter()
    }

    fn deletion_listeners(
        &self,
    ) -> MutexGuard<'_, ListenerRegistry<dyn Fn(PlotId) + Send + Sync>> {
        self.deletion_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn attach_deletion_listener(&self, listener: DeletionListener) -> ListenerId {
        self.deletion_listeners().attach(listener)
    }

    pub fn detach_deletion_listener(&self, id: ListenerId) -> bool {
        self.deletion_listeners().detach(id)
    }

    /// Asks the host to delete `plot`; the group itself keeps it until
    /// [`Self::remove_plot`] is called.
    pub fn request_plot_deletion(&self, plot: PlotId) -> ChartResult<()> {
        if !self.plots.contains_key(&plot) {
            return Err(ChartError::UnknownPlot(plot));
        }
        let listeners = self.deletion_listeners().snapshot();
        for listener in listeners {
            listener(plot);
        }
        Ok(())
    }
}
