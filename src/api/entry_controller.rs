use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{EntryId, EntryScaling, PlottedEntry, SeriesSource};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{MAX_ENTRIES_PER_PLOT, PlotController, ScaleType};

impl<R: Renderer> PlotController<R> {
    /// Appends `source`; returns `false` (and changes nothing) when the plot
    /// is full or already shows it.
    pub fn add_entry(&mut self, source: Arc<dyn SeriesSource>) -> bool {
        self.push_entry(source, EntryScaling::default())
    }

    /// Like [`Self::add_entry`], but rejects a manual range that is not a
    /// finite `min < max` pair before touching the plot.
    pub fn add_entry_with_scaling(
        &mut self,
        source: Arc<dyn SeriesSource>,
        scaling: EntryScaling,
    ) -> ChartResult<bool> {
        if !scaling.auto_scale_enabled {
            super::config::validate_manual_range(scaling.manual_min, scaling.manual_max)?;
        }
        Ok(self.push_entry(source, scaling))
    }

    fn push_entry(&mut self, source: Arc<dyn SeriesSource>, scaling: EntryScaling) -> bool {
        let id = source.id();
        if self.entries.len() >= MAX_ENTRIES_PER_PLOT {
            trace!(entry = id.raw(), "plot is full; entry ignored");
            return false;
        }
        if self.contains_entry(id) {
            trace!(entry = id.raw(), "entry already on plot");
            return false;
        }

        self.entries.push(PlottedEntry::with_scaling(source, scaling));
        self.recompute_aggregate();
        self.request_full_repaint(true);
        debug!(entry = id.raw(), entries = self.entries.len(), "entry added");
        true
    }

    /// Removes `entry` immediately. Use [`super::PlotInbox::request_entry_removal`]
    /// from other threads; those removals apply at the next flush.
    pub fn remove_entry(&mut self, entry: EntryId) -> bool {
        if !self.detach_entry(entry) {
            return false;
        }
        self.request_full_repaint(true);
        true
    }

    pub fn clear_entries(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.recompute_aggregate();
        self.request_full_repaint(true);
    }

    /// Drops the entry and its pending ranges without scheduling a repaint.
    pub(super) fn detach_entry(&mut self, entry: EntryId) -> bool {
        let Some(slot) = self.entry_slot(entry) else {
            return false;
        };
        self.entries.remove(slot);
        self.recompute_aggregate();
        debug!(entry = entry.raw(), entries = self.entries.len(), "entry removed");
        true
    }

    #[must_use]
    pub fn contains_entry(&self, entry: EntryId) -> bool {
        self.entry_slot(entry).is_some()
    }

    #[must_use]
    pub fn entries(&self) -> &[PlottedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry_ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(PlottedEntry::id).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_entry_scaling(&mut self, entry: EntryId, scaling: EntryScaling) -> ChartResult<()> {
        let slot = self
            .entry_slot(entry)
            .ok_or(ChartError::EntryNotOnPlot(entry))?;
        if !scaling.auto_scale_enabled {
            super::config::validate_manual_range(scaling.manual_min, scaling.manual_max)?;
        }
        self.entries[slot].set_scaling(scaling);
        self.recompute_aggregate();
        self.request_full_repaint(true);
        Ok(())
    }

    /// Lower bound `entry` is drawn against under the current scale mode.
    pub fn min_for(&self, entry: EntryId) -> ChartResult<f64> {
        self.range_for(entry).map(|(min, _)| min)
    }

    /// Upper bound `entry` is drawn against under the current scale mode.
    pub fn max_for(&self, entry: EntryId) -> ChartResult<f64> {
        self.range_for(entry).map(|(_, max)| max)
    }

    pub(super) fn range_for(&self, entry: EntryId) -> ChartResult<(f64, f64)> {
        let slot = self
            .entry_slot(entry)
            .ok_or(ChartError::EntryNotOnPlot(entry))?;
        Ok(self.range_for_slot(slot))
    }

    /// Inverted entries report their mirrored range; their samples are
    /// negated when projected.
    pub(super) fn range_for_slot(&self, slot: usize) -> (f64, f64) {
        match self.config.scale_type {
            ScaleType::Individual => self.entries[slot].contributed_range(),
            ScaleType::Auto => self
                .aggregate
                .unwrap_or_else(|| self.entries[slot].contributed_range()),
            ScaleType::Manual => (self.config.manual_min, self.config.manual_max),
        }
    }
}
