//! Contracts for the time-series store the plots read from.
//!
//! The store owns samples, the playback cursor, the in/out markers and the
//! key points. Plots never own any of it; they hold `Arc` handles and read
//! through these traits. Implementations must tolerate calls from the frame
//! thread while notifier threads append samples.

use crate::core::EntryId;

/// Buffer-wide state and the playback cursor.
pub trait BufferFacade: Send + Sync {
    fn current_index(&self) -> i64;

    /// Number of samples currently held; `max_index` is `buffer_length - 1`.
    fn buffer_length(&self) -> usize;

    /// Advances the cursor by `n` (may be negative). Returns `true` when the
    /// cursor wrapped around the in/out range.
    fn tick(&self, n: i64) -> bool;

    fn set_index(&self, index: i64);

    fn in_point(&self) -> i64;

    fn out_point(&self) -> i64;

    /// Recorded key points in ascending order.
    fn key_points(&self) -> Vec<i64>;

    fn is_key_point_mode_active(&self) -> bool;

    /// Next key point after the cursor, or the cursor itself when none.
    fn next_key_point_time(&self) -> i64;

    /// Previous key point before the cursor, or the cursor itself when none.
    fn previous_key_point_time(&self) -> i64;

    fn go_to_in_point(&self) {
        self.set_index(self.in_point());
    }

    fn go_to_out_point(&self) {
        self.set_index(self.out_point());
    }
}

/// Read access to one quantity held by the store.
pub trait SeriesSource: Send + Sync {
    fn id(&self) -> EntryId;

    fn name(&self) -> &str;

    /// Dotted namespace prefix, empty for top-level quantities.
    fn namespace(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples in `[from, to)`, truncated to the available length.
    fn values(&self, from: usize, to: usize) -> Vec<f64>;

    fn value_at(&self, index: usize) -> Option<f64>;

    /// Raw `(min, max)` over every sample held.
    fn bounds(&self) -> (f64, f64);

    /// `true` when samples written since the last reset moved the bounds.
    fn has_min_max_changed(&self) -> bool;

    fn reset_min_max_changed(&self);

    #[must_use]
    fn full_name(&self) -> String {
        if self.namespace().is_empty() {
            self.name().to_owned()
        } else {
            format!("{}.{}", self.namespace(), self.name())
        }
    }
}
