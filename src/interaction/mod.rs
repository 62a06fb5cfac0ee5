use serde::{Deserialize, Serialize};

use crate::core::{EntryId, IndexWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    /// Primary-button drag moving the cursor.
    Scrubbing,
    /// Secondary-button drag shifting the visible window.
    Panning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            control: false,
            alt: false,
            shift: false,
        }
    }

    #[must_use]
    pub const fn control() -> Self {
        Self {
            control: true,
            alt: false,
            shift: false,
        }
    }
}

/// Discrete pointer event in plot-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub click_count: u32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(x: f64, y: f64, button: PointerButton) -> Self {
        Self {
            x,
            y,
            button,
            click_count: 1,
            modifiers: Modifiers::none(),
        }
    }

    #[must_use]
    pub const fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Alt,
    Control,
    Other,
}

/// Pointer-down context captured for the rest of a drag gesture.
///
/// Pan offsets are computed against `window`, the bounds at drag start, so a
/// window already shifted by earlier drag events does not feed back into the
/// next offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    pub clicked_x: i64,
    pub clicked_y: i64,
    pub clicked_index: i64,
    pub window: IndexWindow,
}

/// Kind of drag-and-drop transfer a label press starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragAction {
    Move,
    Copy,
}

/// Follow-up work an input event hands to the host.
///
/// State mutations (cursor, window, baselines, label flags) are already
/// applied when an outcome is returned; these variants cover what only the
/// host can present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputOutcome {
    None,
    EntrySelected { entry: EntryId, drag: DragAction },
    OpenProperties,
    ContextMenu { removable: Vec<EntryId> },
    AddSelectedEntry,
    EntryRemoved(EntryId),
}

/// Per-plot gesture and modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    mode: InteractionMode,
    drag: Option<DragState>,
    focused_baseline: usize,
    cursor_x: f64,
    cursor_y: f64,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            drag: None,
            focused_baseline: 0,
            cursor_x: 0.0,
            cursor_y: 0.0,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn drag(self) -> Option<DragState> {
        self.drag
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn focused_baseline(self) -> usize {
        self.focused_baseline
    }

    pub fn focus_baseline(&mut self, slot: usize) {
        self.focused_baseline = slot;
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent, clicked_index: i64, window: IndexWindow) {
        self.cursor_x = event.x;
        self.cursor_y = event.y;
        self.drag = Some(DragState {
            clicked_x: event.x as i64,
            clicked_y: event.y as i64,
            clicked_index,
            window,
        });
        self.mode = match event.button {
            PointerButton::Primary => InteractionMode::Scrubbing,
            PointerButton::Secondary => InteractionMode::Panning,
            PointerButton::Middle => InteractionMode::Idle,
        };
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn on_pointer_up(&mut self) {
        self.mode = InteractionMode::Idle;
        self.drag = None;
    }
}
