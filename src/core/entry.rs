use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{EntryId, SeriesSource};

/// Per-entry scaling overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryScaling {
    pub inverted: bool,
    pub auto_scale_enabled: bool,
    pub manual_min: f64,
    pub manual_max: f64,
}

impl Default for EntryScaling {
    fn default() -> Self {
        Self {
            inverted: false,
            auto_scale_enabled: true,
            manual_min: 0.0,
            manual_max: 1.0,
        }
    }
}

/// One quantity shown on one plot, with its cached value range.
///
/// The cache is refreshed lazily: only `recompute_min_max` reads the source
/// bounds, and it acknowledges the source's change signal in the same step so
/// a recompute and its reset are never split.
pub struct PlottedEntry {
    source: Arc<dyn SeriesSource>,
    cached_min: f64,
    cached_max: f64,
    min_max_dirty: bool,
    scaling: EntryScaling,
}

impl fmt::Debug for PlottedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlottedEntry")
            .field("id", &self.source.id())
            .field("name", &self.source.name())
            .field("cached_min", &self.cached_min)
            .field("cached_max", &self.cached_max)
            .field("min_max_dirty", &self.min_max_dirty)
            .field("scaling", &self.scaling)
            .finish()
    }
}

impl PlottedEntry {
    #[must_use]
    pub fn new(source: Arc<dyn SeriesSource>) -> Self {
        Self::with_scaling(source, EntryScaling::default())
    }

    #[must_use]
    pub fn with_scaling(source: Arc<dyn SeriesSource>, scaling: EntryScaling) -> Self {
        let mut entry = Self {
            source,
            cached_min: 0.0,
            cached_max: 0.0,
            min_max_dirty: true,
            scaling,
        };
        entry.recompute_min_max();
        entry
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.source.id()
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn SeriesSource> {
        &self.source
    }

    #[must_use]
    pub fn scaling(&self) -> EntryScaling {
        self.scaling
    }

    pub fn set_scaling(&mut self, scaling: EntryScaling) {
        self.scaling = scaling;
    }

    #[must_use]
    pub fn inverted(&self) -> bool {
        self.scaling.inverted
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        if self.scaling.auto_scale_enabled {
            self.cached_min
        } else {
            self.scaling.manual_min
        }
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        if self.scaling.auto_scale_enabled {
            self.cached_max
        } else {
            self.scaling.manual_max
        }
    }

    #[must_use]
    pub fn has_min_max_changed(&self) -> bool {
        self.min_max_dirty || self.source.has_min_max_changed()
    }

    pub fn reset_min_max_changed(&mut self) {
        self.min_max_dirty = false;
        self.source.reset_min_max_changed();
    }

    /// Re-reads the source bounds and acknowledges the change signal.
    ///
    /// Bounds that are not a finite, ordered pair are cached as `(0, 0)`.
    pub fn recompute_min_max(&mut self) {
        let (min, max) = match self.source.bounds() {
            (min, max) if min.is_finite() && max.is_finite() && min <= max => (min, max),
            _ => (0.0, 0.0),
        };
        self.cached_min = min;
        self.cached_max = max;
        self.reset_min_max_changed();
    }

    /// Range this entry contributes to a shared scale; inverted entries are
    /// mirrored around zero.
    #[must_use]
    pub fn contributed_range(&self) -> (f64, f64) {
        let (min, max) = (self.min(), self.max());
        if self.scaling.inverted {
            (-max, -min)
        } else {
            (min, max)
        }
    }
}

/// Lowest min and highest max over `entries`; `None` when empty.
#[must_use]
pub fn aggregate_min_max<'a>(
    entries: impl IntoIterator<Item = &'a PlottedEntry>,
) -> Option<(f64, f64)> {
    entries
        .into_iter()
        .map(PlottedEntry::contributed_range)
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}
