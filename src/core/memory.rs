use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::{BufferFacade, EntryId, SeriesSource};

/// In-memory buffer used by tests and headless hosts.
///
/// Cursor movement wraps inside `[in_point, out_point]` the way a playback
/// loop does.
#[derive(Debug)]
pub struct MemoryBuffer {
    state: Mutex<MemoryBufferState>,
}

#[derive(Debug, Clone)]
struct MemoryBufferState {
    index: i64,
    length: usize,
    in_point: i64,
    out_point: i64,
    key_points: Vec<i64>,
    key_point_mode: bool,
}

impl MemoryBuffer {
    #[must_use]
    pub fn new(length: usize) -> Self {
        let last = length.saturating_sub(1) as i64;
        Self {
            state: Mutex::new(MemoryBufferState {
                index: 0,
                length,
                in_point: 0,
                out_point: last,
                key_points: Vec::new(),
                key_point_mode: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryBufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resizes the buffer; the out point and cursor are pulled inside.
    pub fn set_length(&self, length: usize) {
        let mut state = self.lock();
        let last = length.saturating_sub(1) as i64;
        state.length = length;
        state.out_point = state.out_point.min(last);
        state.in_point = state.in_point.min(state.out_point);
        state.index = state.index.clamp(0, last);
    }

    pub fn set_in_out_points(&self, in_point: i64, out_point: i64) {
        let mut state = self.lock();
        let last = state.length.saturating_sub(1) as i64;
        state.in_point = in_point.clamp(0, last);
        state.out_point = out_point.clamp(state.in_point, last);
    }

    pub fn set_key_points(&self, mut key_points: Vec<i64>) {
        key_points.sort_unstable();
        key_points.dedup();
        self.lock().key_points = key_points;
    }

    pub fn set_key_point_mode(&self, active: bool) {
        self.lock().key_point_mode = active;
    }
}

impl BufferFacade for MemoryBuffer {
    fn current_index(&self) -> i64 {
        self.lock().index
    }

    fn buffer_length(&self) -> usize {
        self.lock().length
    }

    fn tick(&self, n: i64) -> bool {
        let mut state = self.lock();
        let span = state.out_point - state.in_point + 1;
        if span <= 0 {
            return false;
        }
        let target = state.index + n;
        if target > state.out_point || target < state.in_point {
            let offset = (target - state.in_point).rem_euclid(span);
            state.index = state.in_point + offset;
            return true;
        }
        state.index = target;
        false
    }

    fn set_index(&self, index: i64) {
        let mut state = self.lock();
        let last = state.length.saturating_sub(1) as i64;
        state.index = index.clamp(0, last);
    }

    fn in_point(&self) -> i64 {
        self.lock().in_point
    }

    fn out_point(&self) -> i64 {
        self.lock().out_point
    }

    fn key_points(&self) -> Vec<i64> {
        self.lock().key_points.clone()
    }

    fn is_key_point_mode_active(&self) -> bool {
        self.lock().key_point_mode
    }

    fn next_key_point_time(&self) -> i64 {
        let state = self.lock();
        state
            .key_points
            .iter()
            .copied()
            .find(|&key| key > state.index)
            .unwrap_or(state.index)
    }

    fn previous_key_point_time(&self) -> i64 {
        let state = self.lock();
        state
            .key_points
            .iter()
            .rev()
            .copied()
            .find(|&key| key < state.index)
            .unwrap_or(state.index)
    }
}

/// In-memory series; flags a bounds change whenever a write moves min or max.
#[derive(Debug)]
pub struct MemorySeries {
    id: EntryId,
    name: String,
    namespace: String,
    samples: Mutex<Vec<f64>>,
    bounds_changed: AtomicBool,
}

impl MemorySeries {
    #[must_use]
    pub fn new(id: EntryId, name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            namespace: String::new(),
            samples: Mutex::new(samples),
            bounds_changed: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f64>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes `value` at `index`, growing the series with the value if needed.
    pub fn write(&self, index: usize, value: f64) {
        let mut samples = self.lock();
        let (min, max) = raw_bounds(&samples);
        if index >= samples.len() {
            samples.resize(index + 1, value);
        } else {
            samples[index] = value;
        }
        let (new_min, new_max) = raw_bounds(&samples);
        if new_min != min || new_max != max {
            self.bounds_changed.store(true, Ordering::Release);
        }
    }

    pub fn push(&self, value: f64) {
        let len = self.lock().len();
        self.write(len, value);
    }
}

impl SeriesSource for MemorySeries {
    fn id(&self) -> EntryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn values(&self, from: usize, to: usize) -> Vec<f64> {
        let samples = self.lock();
        let to = to.min(samples.len());
        if from >= to {
            return Vec::new();
        }
        samples[from..to].to_vec()
    }

    fn value_at(&self, index: usize) -> Option<f64> {
        self.lock().get(index).copied()
    }

    fn bounds(&self) -> (f64, f64) {
        raw_bounds(&self.lock())
    }

    fn has_min_max_changed(&self) -> bool {
        self.bounds_changed.load(Ordering::Acquire)
    }

    fn reset_min_max_changed(&self) {
        self.bounds_changed.store(false, Ordering::Release);
    }
}

/// Bounds over the finite samples; `(0, 0)` when there are none.
fn raw_bounds(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |bounds, value| match bounds {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
        .unwrap_or((0.0, 0.0))
}
