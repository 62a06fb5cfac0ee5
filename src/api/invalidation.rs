use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{EntryId, IndexWindow};

/// Half-open index interval `[from, to)` awaiting redraw for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyRange {
    pub from: i64,
    pub to: i64,
}

impl DirtyRange {
    #[must_use]
    pub const fn new(from: i64, count: i64) -> Self {
        Self {
            from,
            to: from + count,
        }
    }

    #[must_use]
    pub const fn count(self) -> i64 {
        self.to - self.from
    }

    /// Smallest range covering both; gaps between them are covered too.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}

/// Redraw work accumulated for one plot since its last flush.
///
/// While `full_repaint_pending` is set `entry_ranges` stays empty: a full
/// repaint redraws every entry, so partial ranges are absorbed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotDirtyState {
    pub full_repaint_pending: bool,
    pub pending_window: Option<IndexWindow>,
    pub override_scale: bool,
    pub index_overlay_dirty: bool,
    pub label_overlay_dirty: bool,
    pub entry_ranges: IndexMap<EntryId, DirtyRange>,
    pub pending_removals: Vec<EntryId>,
}

impl PlotDirtyState {
    pub fn request_full_repaint(&mut self, window: IndexWindow, override_scale: bool) {
        self.pending_window = Some(match self.pending_window {
            Some(pending) if self.full_repaint_pending => IndexWindow::new(
                pending.left.min(window.left),
                pending.right.max(window.right),
            ),
            _ => window,
        });
        self.full_repaint_pending = true;
        self.override_scale |= override_scale;
        self.entry_ranges.clear();
    }

    /// Records `count` points from `from` for `entry`; returns whether the
    /// request was kept.
    pub fn request_entry_range(&mut self, entry: EntryId, from: i64, count: i64) -> bool {
        if count < 2 {
            trace!(entry = entry.raw(), from, count, "sub-2-point repaint ignored");
            return false;
        }
        if self.full_repaint_pending {
            return false;
        }

        let range = DirtyRange::new(from, count);
        self.entry_ranges
            .entry(entry)
            .and_modify(|existing| *existing = existing.merge(range))
            .or_insert(range);
        true
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.full_repaint_pending
            && !self.index_overlay_dirty
            && !self.label_overlay_dirty
            && self.entry_ranges.is_empty()
            && self.pending_removals.is_empty()
    }
}

#[derive(Debug, Default)]
struct InboxShared {
    state: Mutex<PlotDirtyState>,
    phase_plot: AtomicBool,
}

/// Thread-safe handle for marking one plot dirty.
///
/// Clones share state. Notifier threads merge into it; the frame thread
/// drains it once per flush.
#[derive(Debug, Clone, Default)]
pub struct PlotInbox {
    shared: Arc<InboxShared>,
}

impl PlotInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PlotDirtyState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_phase_plot(&self, phase: bool) {
        self.shared.phase_plot.store(phase, Ordering::Release);
    }

    pub fn request_full_repaint(&self, window: IndexWindow, override_scale: bool) {
        self.lock().request_full_repaint(window, override_scale);
    }

    pub fn request_entry_range(&self, entry: EntryId, from: i64, count: i64) -> bool {
        self.lock().request_entry_range(entry, from, count)
    }

    /// Schedules the redraw a data write at `at` needs.
    ///
    /// Time plots redraw the segment ending at `at`; phase plots scatter the
    /// whole series and need a full repaint over `window`.
    pub fn notify_entry_data_changed(&self, entry: EntryId, at: i64, window: IndexWindow) {
        if self.shared.phase_plot.load(Ordering::Acquire) {
            self.request_full_repaint(window, false);
        } else {
            self.request_entry_range(entry, (at - 1).max(0), 2);
        }
    }

    pub fn mark_index_overlay(&self) {
        self.lock().index_overlay_dirty = true;
    }

    pub fn mark_label_overlay(&self) {
        self.lock().label_overlay_dirty = true;
    }

    /// Queues removal of `entry` for the next flush.
    pub fn request_entry_removal(&self, entry: EntryId) {
        let mut state = self.lock();
        if !state.pending_removals.contains(&entry) {
            state.pending_removals.push(entry);
        }
    }

    #[must_use]
    pub fn peek(&self) -> PlotDirtyState {
        self.lock().clone()
    }

    /// Takes the accumulated state, leaving it clean.
    pub fn drain(&self) -> PlotDirtyState {
        std::mem::take(&mut *self.lock())
    }
}
