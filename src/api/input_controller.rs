use tracing::trace;

use crate::core::IndexWindow;
use crate::interaction::{DragAction, InputOutcome, KeyCode, PointerButton, PointerEvent};
use crate::render::Renderer;

use super::plot_geometry::{TIMELINE_DEAD_ZONE_PX, index_at_x};
use super::{GraphType, MAX_BASELINES, PlotController};

impl<R: Renderer> PlotController<R> {
    /// Handles a button press at plot-local `(x, y)`.
    ///
    /// The press also records the drag-start context later drag events are
    /// measured against.
    pub fn pointer_down(&mut self, event: PointerEvent) -> InputOutcome {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let visible = self.window.visible_window();
        let clicked_index = index_at_x(event.x, visible, width);
        self.interaction.on_pointer_down(event, clicked_index, visible);

        if event.click_count == 2 && !self.entries.is_empty() {
            return InputOutcome::OpenProperties;
        }

        let layout = self.label_layout();
        let in_labels = event.y > layout.label_area_top(height);

        match event.button {
            PointerButton::Middle => {
                if !in_labels {
                    return InputOutcome::AddSelectedEntry;
                }
                let Some(slot) = layout.entry_at(event.x, event.y, height) else {
                    return InputOutcome::None;
                };
                let entry = self.entries[slot].id();
                self.remove_entry(entry);
                InputOutcome::EntryRemoved(entry)
            }
            PointerButton::Primary => {
                if self.entries.is_empty() || self.config.graph_type == GraphType::Phase {
                    return InputOutcome::None;
                }
                if !in_labels {
                    self.window.set_index_later(clicked_index);
                    return InputOutcome::None;
                }
                let Some(slot) = layout.entry_at(event.x, event.y, height) else {
                    return InputOutcome::None;
                };
                let drag = if event.modifiers.control {
                    DragAction::Copy
                } else {
                    DragAction::Move
                };
                InputOutcome::EntrySelected {
                    entry: self.entries[slot].id(),
                    drag,
                }
            }
            PointerButton::Secondary => InputOutcome::ContextMenu {
                removable: self.entry_ids(),
            },
        }
    }

    /// Continues the gesture started by the last [`Self::pointer_down`].
    pub fn pointer_drag(&mut self, x: f64, y: f64, button: PointerButton) {
        self.interaction.on_pointer_move(x, y);
        let Some(drag) = self.interaction.drag() else {
            return;
        };

        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let x = x.clamp(0.0, width);
        if drag.clicked_y as f64 > height - TIMELINE_DEAD_ZONE_PX {
            trace!(clicked_y = drag.clicked_y, "drag started in timeline strip ignored");
            return;
        }

        match button {
            PointerButton::Primary if self.config.graph_type != GraphType::Phase => {
                let index = index_at_x(x, self.window.visible_window(), width);
                self.window.set_index_later(index);
            }
            PointerButton::Secondary => {
                let index = index_at_x(x, drag.window, width);
                let shift = drag.clicked_index - index;
                let panned = clamp_pan(drag.window, shift, self.window.max_index());
                self.window.set_visible_window(panned);
            }
            PointerButton::Primary | PointerButton::Middle => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction.on_pointer_up();
    }

    pub fn key_down(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => self.window.tick_later(-1),
            KeyCode::Right => self.window.tick_later(1),
            KeyCode::Alt => self.set_show_namespaces(true),
            KeyCode::Control => self.set_show_baselines_info(true),
            KeyCode::Up => self.increment_baseline(self.interaction.focused_baseline(), 1.0),
            KeyCode::Down => self.increment_baseline(self.interaction.focused_baseline(), -1.0),
            KeyCode::Other => {}
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        match key {
            KeyCode::Alt => self.set_show_namespaces(false),
            KeyCode::Control => self.set_show_baselines_info(false),
            _ => {}
        }
    }

    /// `1`-`6` focus a baseline, `z` zeroes it and `c` centers it.
    pub fn key_typed(&mut self, ch: char) {
        match ch {
            '1'..='6' => {
                let slot = ch as usize - '1' as usize;
                debug_assert!(slot < MAX_BASELINES);
                self.interaction.focus_baseline(slot);
            }
            'z' => self.zero_baseline(self.interaction.focused_baseline()),
            'c' => self.center_baseline(self.interaction.focused_baseline()),
            _ => {}
        }
    }
}

/// Shifts `start` by `shift` samples, keeping its width inside `[0, max_index]`.
fn clamp_pan(start: IndexWindow, shift: i64, max_index: i64) -> IndexWindow {
    let width = start.width();
    let mut left = start.left + shift;
    let mut right = start.right + shift;

    if left < 0 {
        left = 0;
        right = width;
    }
    if right > max_index {
        right = max_index;
        left = right - width;
    }
    IndexWindow::new(left.max(0), right)
}
