use std::sync::Arc;

use tracing::debug;

use crate::core::{
    EntryId, IndexWindow, IndexWindowModel, ListenerId, PlottedEntry, Viewport,
    aggregate_min_max,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::InteractionState;
use crate::render::Renderer;

use super::plot_geometry::LabelLayout;
use super::{GraphType, PlotConfig, PlotInbox};

/// Detaches a plot's window listeners when the plot goes away.
struct ListenerGuard {
    window: Arc<dyn IndexWindowModel>,
    index_listener: ListenerId,
    window_listener: ListenerId,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.window.detach_index_listener(self.index_listener);
        self.window.detach_window_listener(self.window_listener);
    }
}

/// One plot of a synchronized group.
///
/// Mutations only record dirty state; [`PlotController::flush`] turns it into
/// a single [`crate::render::RenderFrame`] per frame. Work that may arrive
/// from other threads goes through the cloneable [`PlotInbox`].
pub struct PlotController<R: Renderer> {
    pub(super) renderer: R,
    pub(super) window: Arc<dyn IndexWindowModel>,
    pub(super) entries: Vec<PlottedEntry>,
    pub(super) config: PlotConfig,
    pub(super) inbox: PlotInbox,
    pub(super) viewport: Viewport,
    pub(super) interaction: InteractionState,
    pub(super) aggregate: Option<(f64, f64)>,
    /// Entry slots whose layers hold content from earlier frames.
    pub(super) drawn_slots: usize,
    _listeners: ListenerGuard,
}

impl<R: Renderer> PlotController<R> {
    /// Creates an empty TIME plot bound to `window`.
    pub fn new(
        renderer: R,
        window: Arc<dyn IndexWindowModel>,
        viewport: Viewport,
    ) -> ChartResult<Self> {
        Self::with_config(renderer, window, viewport, PlotConfig::default())
    }

    pub fn with_config(
        renderer: R,
        window: Arc<dyn IndexWindowModel>,
        viewport: Viewport,
        config: PlotConfig,
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        config.validate()?;

        let inbox = PlotInbox::new();
        inbox.set_phase_plot(config.graph_type == GraphType::Phase);

        let index_inbox = inbox.clone();
        let index_listener = window.attach_index_listener(Arc::new(move |_index: i64| {
            index_inbox.mark_index_overlay();
            index_inbox.mark_label_overlay();
        }));
        let window_inbox = inbox.clone();
        let window_listener =
            window.attach_window_listener(Arc::new(move |visible: IndexWindow| {
                window_inbox.request_full_repaint(visible, false);
                window_inbox.mark_index_overlay();
            }));

        inbox.request_full_repaint(window.visible_window(), true);
        inbox.mark_index_overlay();
        inbox.mark_label_overlay();

        Ok(Self {
            renderer,
            window: Arc::clone(&window),
            entries: Vec::new(),
            config,
            inbox,
            viewport,
            interaction: InteractionState::default(),
            aggregate: None,
            drawn_slots: 0,
            _listeners: ListenerGuard {
                window,
                index_listener,
                window_listener,
            },
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn window(&self) -> &Arc<dyn IndexWindowModel> {
        &self.window
    }

    /// Cloneable handle other threads use to mark this plot dirty.
    #[must_use]
    pub fn inbox(&self) -> PlotInbox {
        self.inbox.clone()
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Reduced `(min, max)` over all entries; `None` without entries.
    #[must_use]
    pub fn aggregate_range(&self) -> Option<(f64, f64)> {
        self.aggregate
    }

    /// Data written at `at` for `entry`; ignored for entries on other plots.
    pub fn on_entry_data_changed(&self, entry: EntryId, at: i64) {
        if self.contains_entry(entry) {
            self.inbox
                .notify_entry_data_changed(entry, at, self.window.visible_window());
        }
    }

    pub fn on_index_changed(&self) {
        self.inbox.mark_index_overlay();
        self.inbox.mark_label_overlay();
    }

    pub fn on_buffer_changed(&self) {
        self.inbox
            .request_full_repaint(self.window.visible_window(), true);
        self.inbox.mark_index_overlay();
    }

    pub fn on_manual_end_points_changed(&self) {
        self.inbox.mark_index_overlay();
    }

    pub(super) fn recompute_aggregate(&mut self) {
        self.aggregate = aggregate_min_max(&self.entries);
        debug!(
            entries = self.entries.len(),
            aggregate = ?self.aggregate,
            "plot aggregate range recomputed"
        );
    }

    pub(super) fn request_full_repaint(&self, override_scale: bool) {
        self.inbox
            .request_full_repaint(self.window.visible_window(), override_scale);
        self.inbox.mark_label_overlay();
    }

    pub(super) fn entry_slot(&self, entry: EntryId) -> Option<usize> {
        self.entries.iter().position(|plotted| plotted.id() == entry)
    }

    pub(super) fn label_layout(&self) -> LabelLayout {
        let show_namespaces = self.config.show_namespaces;
        LabelLayout::compute(
            self.entries.iter().map(|entry| {
                let source = entry.source();
                if show_namespaces {
                    source.full_name().chars().count()
                } else {
                    source.name().chars().count()
                }
            }),
            f64::from(self.viewport.width),
        )
    }
}
