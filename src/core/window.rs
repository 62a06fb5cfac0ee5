//! Shared playback cursor and visible-window state for a group of plots.
//!
//! Input handlers only record intent (`tick_later`, `set_index_later`); the
//! frame driver commits it with a single `apply_pending` per frame. Zoom and
//! pan mutate the visible window immediately because they are computed from
//! the current state rather than queued against future buffer movement.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{BufferFacade, IndexWindow, ListenerId};
use crate::error::{ChartError, ChartResult};

/// Narrowest visible window, in samples, that zooming may produce.
pub const MIN_WINDOW_WIDTH: i64 = 4;

/// Zoom factor used by the plain zoom-in/zoom-out gestures.
pub const DEFAULT_ZOOM_FACTOR: i64 = 2;

pub type IndexListener = Arc<dyn Fn(i64) + Send + Sync>;
pub type WindowListener = Arc<dyn Fn(IndexWindow) + Send + Sync>;

/// Point-in-time view of the window model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeIndexWindow {
    pub current_index: i64,
    pub in_point: i64,
    pub out_point: i64,
    pub left_plot_index: i64,
    pub right_plot_index: i64,
    pub max_index: i64,
    /// `0` means no pending tick.
    pub pending_tick: i64,
    pub pending_index: Option<i64>,
}

/// Capability interface shared by every plot of a synchronized group.
///
/// Listener callbacks run synchronously on the thread that triggered the
/// change, in attach order. Callbacks must not attach or detach listeners.
pub trait IndexWindowModel: Send + Sync {
    fn current_index(&self) -> i64;

    fn in_point(&self) -> i64;

    fn out_point(&self) -> i64;

    fn left_plot_index(&self) -> i64;

    fn right_plot_index(&self) -> i64;

    fn max_index(&self) -> i64;

    fn key_points(&self) -> Vec<i64>;

    fn tick_later(&self, n: i64);

    fn set_index_later(&self, index: i64);

    /// Commits pending intent; returns whether anything was committed.
    fn apply_pending(&self) -> bool;

    fn set_left_plot_index(&self, index: i64);

    fn set_right_plot_index(&self, index: i64);

    /// Replaces both bounds at once, clamped to `[0, max_index]`.
    fn set_visible_window(&self, window: IndexWindow);

    fn zoom_in(&self, factor: i64) -> ChartResult<()>;

    fn zoom_out(&self, factor: i64) -> ChartResult<()>;

    fn zoom_full_view(&self);

    fn on_buffer_size_changed(&self);

    fn attach_index_listener(&self, listener: IndexListener) -> ListenerId;

    fn detach_index_listener(&self, id: ListenerId) -> bool;

    fn notify_index_listeners(&self);

    fn attach_window_listener(&self, listener: WindowListener) -> ListenerId;

    fn detach_window_listener(&self, id: ListenerId) -> bool;

    fn snapshot(&self) -> TimeIndexWindow;

    fn visible_window(&self) -> IndexWindow {
        IndexWindow::new(self.left_plot_index(), self.right_plot_index())
    }

    fn is_index_at_out_point(&self) -> bool {
        self.current_index() == self.out_point()
    }

    /// Re-centers the window on the cursor at the same width.
    fn recenter(&self) -> ChartResult<()> {
        self.zoom_in(1)
    }

    fn zoom_in_default(&self) -> ChartResult<()> {
        self.zoom_in(DEFAULT_ZOOM_FACTOR)
    }

    fn zoom_out_default(&self) -> ChartResult<()> {
        self.zoom_out(DEFAULT_ZOOM_FACTOR)
    }
}

/// Insertion-ordered callback map.
pub(crate) struct ListenerRegistry<F: ?Sized> {
    next_id: u64,
    listeners: IndexMap<ListenerId, Arc<F>>,
}

impl<F: ?Sized> Default for ListenerRegistry<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: IndexMap::new(),
        }
    }
}

impl<F: ?Sized> ListenerRegistry<F> {
    pub(crate) fn attach(&mut self, listener: Arc<F>) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    pub(crate) fn detach(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    /// Clones the callbacks so they run without the registry lock held.
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.listeners.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Computes the window of width `new_width` centered on `index`, shifted back
/// inside `[0, max_index]`.
///
/// Returns `None` when the requested width is below [`MIN_WINDOW_WIDTH`] or
/// the buffer is empty.
#[must_use]
pub fn centered_window(index: i64, new_width: i64, max_index: i64) -> Option<IndexWindow> {
    if new_width < MIN_WINDOW_WIDTH || max_index < 0 {
        return None;
    }

    let index = index.clamp(0, max_index);
    let mut left = index - (new_width + 1) / 2;
    let mut right = left + new_width;

    if left < 0 {
        right -= left;
        left = 0;
        right = right.min(max_index);
    } else if right > max_index {
        left -= right - max_index;
        right = max_index;
        left = left.max(0);
    }

    Some(IndexWindow::new(left, right))
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    left: i64,
    right: i64,
    pending_tick: i64,
    pending_index: Option<i64>,
}

/// Stateful window model backed by a live buffer.
pub struct SharedIndexWindow {
    buffer: Arc<dyn BufferFacade>,
    state: Mutex<WindowState>,
    index_listeners: Mutex<ListenerRegistry<dyn Fn(i64) + Send + Sync>>,
    window_listeners: Mutex<ListenerRegistry<dyn Fn(IndexWindow) + Send + Sync>>,
}

impl SharedIndexWindow {
    /// Creates a model whose window initially spans the whole buffer.
    #[must_use]
    pub fn new(buffer: Arc<dyn BufferFacade>) -> Self {
        let right = (buffer.buffer_length() as i64 - 1).max(0);
        Self {
            buffer,
            state: Mutex::new(WindowState {
                left: 0,
                right,
                pending_tick: 0,
                pending_index: None,
            }),
            index_listeners: Mutex::new(ListenerRegistry::default()),
            window_listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &Arc<dyn BufferFacade> {
        &self.buffer
    }

    /// Commits a tick immediately, bypassing the per-frame queue.
    pub fn tick_now(&self, n: i64) -> bool {
        let before = self.buffer.current_index();
        let wrapped = self.buffer.tick(n);
        self.notify_if_moved(before);
        wrapped
    }

    pub fn go_to_in_point_now(&self) {
        let before = self.buffer.current_index();
        self.buffer.go_to_in_point();
        self.notify_if_moved(before);
    }

    pub fn go_to_out_point_now(&self) {
        let before = self.buffer.current_index();
        self.buffer.go_to_out_point();
        self.notify_if_moved(before);
    }

    fn notify_if_moved(&self, before: i64) {
        if self.buffer.current_index() != before {
            self.notify_index_listeners();
        }
    }

    fn update_window(&self, update: impl FnOnce(&mut WindowState, i64)) {
        let max_index = self.max_index();
        let changed = {
            let mut state = lock(&self.state);
            let before = (state.left, state.right);
            update(&mut state, max_index);
            (state.left, state.right) != before
        };
        if changed {
            self.notify_window_listeners();
        }
    }

    fn notify_window_listeners(&self) {
        let window = self.visible_window();
        let listeners = lock(&self.window_listeners).snapshot();
        for listener in listeners {
            listener(window);
        }
    }

    fn zoom_to_width(&self, new_width: impl FnOnce(i64) -> i64) {
        let index = self.current_index();
        self.update_window(|state, max_index| {
            let width = new_width(state.right - state.left);
            match centered_window(index, width, max_index) {
                Some(window) => {
                    state.left = window.left;
                    state.right = window.right;
                }
                None => trace!(width, max_index, "zoom request below minimum width ignored"),
            }
        });
    }
}

impl IndexWindowModel for SharedIndexWindow {
    fn current_index(&self) -> i64 {
        self.buffer.current_index()
    }

    fn in_point(&self) -> i64 {
        self.buffer.in_point()
    }

    fn out_point(&self) -> i64 {
        self.buffer.out_point()
    }

    fn left_plot_index(&self) -> i64 {
        lock(&self.state).left
    }

    fn right_plot_index(&self) -> i64 {
        lock(&self.state).right
    }

    fn max_index(&self) -> i64 {
        self.buffer.buffer_length() as i64 - 1
    }

    fn key_points(&self) -> Vec<i64> {
        self.buffer.key_points()
    }

    fn tick_later(&self, n: i64) {
        if self.buffer.is_key_point_mode_active() {
            match n.signum() {
                1 => self.set_index_later(self.buffer.next_key_point_time()),
                -1 => self.set_index_later(self.buffer.previous_key_point_time()),
                _ => {}
            }
            return;
        }
        lock(&self.state).pending_tick = n;
    }

    fn set_index_later(&self, index: i64) {
        lock(&self.state).pending_index = Some(index);
    }

    fn apply_pending(&self) -> bool {
        let (tick, index) = {
            let mut state = lock(&self.state);
            let pending = (state.pending_tick, state.pending_index.take());
            state.pending_tick = 0;
            pending
        };
        if tick == 0 && index.is_none() {
            return false;
        }

        let before = self.buffer.current_index();
        if tick != 0 {
            self.buffer.tick(tick);
        }
        if let Some(index) = index {
            self.buffer.set_index(index);
        }
        trace!(tick, ?index, before, after = self.buffer.current_index(), "applied pending index intent");
        self.notify_if_moved(before);
        true
    }

    fn set_left_plot_index(&self, index: i64) {
        self.update_window(|state, max_index| {
            state.left = index.clamp(0, max_index.max(0));
            state.right = state.right.max(state.left);
        });
    }

    fn set_right_plot_index(&self, index: i64) {
        self.update_window(|state, max_index| {
            state.right = index.clamp(0, max_index.max(0));
            state.left = state.left.min(state.right);
        });
    }

    fn set_visible_window(&self, window: IndexWindow) {
        self.update_window(|state, max_index| {
            let upper = max_index.max(0);
            let left = window.left.clamp(0, upper);
            state.left = left;
            state.right = window.right.clamp(left, upper);
        });
    }

    fn zoom_in(&self, factor: i64) -> ChartResult<()> {
        if factor < 1 {
            return Err(ChartError::InvalidData(
                "zoom factor must be >= 1".to_owned(),
            ));
        }
        self.zoom_to_width(|width| width / factor);
        Ok(())
    }

    fn zoom_out(&self, factor: i64) -> ChartResult<()> {
        if factor < 1 {
            return Err(ChartError::InvalidData(
                "zoom factor must be >= 1".to_owned(),
            ));
        }
        self.zoom_to_width(|width| width.saturating_mul(factor));
        Ok(())
    }

    fn zoom_full_view(&self) {
        self.update_window(|state, max_index| {
            state.left = 0;
            state.right = max_index.max(0);
        });
    }

    fn on_buffer_size_changed(&self) {
        self.update_window(|state, max_index| {
            state.right = state.right.min(max_index);
        });
    }

    fn attach_index_listener(&self, listener: IndexListener) -> ListenerId {
        lock(&self.index_listeners).attach(listener)
    }

    fn detach_index_listener(&self, id: ListenerId) -> bool {
        lock(&self.index_listeners).detach(id)
    }

    fn notify_index_listeners(&self) {
        let index = self.current_index();
        let listeners = lock(&self.index_listeners).snapshot();
        for listener in listeners {
            listener(index);
        }
    }

    fn attach_window_listener(&self, listener: WindowListener) -> ListenerId {
        lock(&self.window_listeners).attach(listener)
    }

    fn detach_window_listener(&self, id: ListenerId) -> bool {
        lock(&self.window_listeners).detach(id)
    }

    fn snapshot(&self) -> TimeIndexWindow {
        let state = *lock(&self.state);
        TimeIndexWindow {
            current_index: self.current_index(),
            in_point: self.in_point(),
            out_point: self.out_point(),
            left_plot_index: state.left,
            right_plot_index: state.right,
            max_index: self.max_index(),
            pending_tick: state.pending_tick,
            pending_index: state.pending_index,
        }
    }
}

/// Window model with constant `[0, size]` bounds that ignores every mutation.
///
/// Used for plots that show a whole fixed-size buffer and never scrub.
pub struct FixedIndexWindow {
    size: i64,
    index: i64,
    index_listeners: Mutex<ListenerRegistry<dyn Fn(i64) + Send + Sync>>,
    window_listeners: Mutex<ListenerRegistry<dyn Fn(IndexWindow) + Send + Sync>>,
}

impl FixedIndexWindow {
    #[must_use]
    pub fn new(size: i64) -> Self {
        Self::with_index(size, 0)
    }

    #[must_use]
    pub fn with_index(size: i64, index: i64) -> Self {
        let size = size.max(0);
        Self {
            size,
            index: index.clamp(0, size),
            index_listeners: Mutex::new(ListenerRegistry::default()),
            window_listeners: Mutex::new(ListenerRegistry::default()),
        }
    }
}

impl IndexWindowModel for FixedIndexWindow {
    fn current_index(&self) -> i64 {
        self.index
    }

    fn in_point(&self) -> i64 {
        0
    }

    fn out_point(&self) -> i64 {
        self.size
    }

    fn left_plot_index(&self) -> i64 {
        0
    }

    fn right_plot_index(&self) -> i64 {
        self.size
    }

    fn max_index(&self) -> i64 {
        self.size
    }

    fn key_points(&self) -> Vec<i64> {
        Vec::new()
    }

    fn tick_later(&self, _n: i64) {}

    fn set_index_later(&self, _index: i64) {}

    fn apply_pending(&self) -> bool {
        false
    }

    fn set_left_plot_index(&self, _index: i64) {}

    fn set_right_plot_index(&self, _index: i64) {}

    fn set_visible_window(&self, _window: IndexWindow) {}

    fn zoom_in(&self, _factor: i64) -> ChartResult<()> {
        Ok(())
    }

    fn zoom_out(&self, _factor: i64) -> ChartResult<()> {
        Ok(())
    }

    fn zoom_full_view(&self) {}

    fn on_buffer_size_changed(&self) {}

    fn attach_index_listener(&self, listener: IndexListener) -> ListenerId {
        lock(&self.index_listeners).attach(listener)
    }

    fn detach_index_listener(&self, id: ListenerId) -> bool {
        lock(&self.index_listeners).detach(id)
    }

    fn notify_index_listeners(&self) {
        let listeners = lock(&self.index_listeners).snapshot();
        for listener in listeners {
            listener(self.index);
        }
    }

    fn attach_window_listener(&self, listener: WindowListener) -> ListenerId {
        lock(&self.window_listeners).attach(listener)
    }

    fn detach_window_listener(&self, id: ListenerId) -> bool {
        lock(&self.window_listeners).detach(id)
    }

    fn snapshot(&self) -> TimeIndexWindow {
        TimeIndexWindow {
            current_index: self.index,
            in_point: 0,
            out_point: self.size,
            left_plot_index: 0,
            right_plot_index: self.size,
            max_index: self.size,
            pending_tick: 0,
            pending_index: None,
        }
    }
}
