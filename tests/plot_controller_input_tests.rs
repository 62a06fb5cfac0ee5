use std::sync::Arc;

use approx::assert_relative_eq;
use scrub_chart::api::{GraphType, PlotConfig};
use scrub_chart::core::{
    BufferFacade, EntryId, IndexWindow, IndexWindowModel, MemoryBuffer, MemorySeries,
    SharedIndexWindow, Viewport,
};
use scrub_chart::interaction::{
    DragAction, InputOutcome, InteractionMode, KeyCode, Modifiers, PointerButton, PointerEvent,
};
use scrub_chart::render::NullRenderer;
use scrub_chart::PlotController;

const ALPHA: EntryId = EntryId::new(1);

struct Fixture {
    buffer: Arc<MemoryBuffer>,
    window: Arc<SharedIndexWindow>,
    plot: PlotController<NullRenderer>,
}

fn fixture_with(config: PlotConfig, entries: usize) -> Fixture {
    let buffer = Arc::new(MemoryBuffer::new(100));
    let window = Arc::new(SharedIndexWindow::new(buffer.clone()));
    let mut plot = PlotController::with_config(
        NullRenderer::default(),
        window.clone(),
        Viewport::new(400, 200),
        config,
    )
    .expect("plot init");

    let names = ["alpha", "beta"];
    for (id, name) in names.iter().enumerate().take(entries) {
        let samples = (0..100).map(|i| (i % 2) as f64).collect();
        let series = MemorySeries::new(EntryId::new(id as u64 + 1), *name, samples)
            .with_namespace("robot");
        plot.add_entry(Arc::new(series));
    }
    plot.flush().expect("initial flush");

    Fixture {
        buffer,
        window,
        plot,
    }
}

fn fixture() -> Fixture {
    fixture_with(PlotConfig::default(), 1)
}

fn press(x: f64, y: f64, button: PointerButton) -> PointerEvent {
    PointerEvent::new(x, y, button)
}

#[test]
fn primary_click_queues_index_under_pointer() {
    let mut fixture = fixture();

    let outcome = fixture
        .plot
        .pointer_down(press(200.0, 100.0, PointerButton::Primary));
    assert_eq!(outcome, InputOutcome::None);
    assert_eq!(fixture.buffer.current_index(), 0);

    assert!(fixture.window.apply_pending());
    assert_eq!(fixture.buffer.current_index(), 49);
}

#[test]
fn primary_drag_scrubs_with_clamped_pointer() {
    let mut fixture = fixture();
    fixture
        .plot
        .pointer_down(press(0.0, 100.0, PointerButton::Primary));
    assert_eq!(fixture.plot.interaction().mode(), InteractionMode::Scrubbing);

    fixture
        .plot
        .pointer_drag(450.0, 100.0, PointerButton::Primary);
    assert_eq!(fixture.window.snapshot().pending_index, Some(99));

    fixture
        .plot
        .pointer_drag(-50.0, 100.0, PointerButton::Primary);
    assert_eq!(fixture.window.snapshot().pending_index, Some(0));
}

#[test]
fn secondary_drag_pans_against_window_at_press() {
    let mut fixture = fixture();
    fixture.window.set_visible_window(IndexWindow::new(20, 60));

    let outcome = fixture
        .plot
        .pointer_down(press(200.0, 100.0, PointerButton::Secondary));
    assert_eq!(
        outcome,
        InputOutcome::ContextMenu {
            removable: vec![ALPHA],
        }
    );

    fixture
        .plot
        .pointer_drag(100.0, 100.0, PointerButton::Secondary);
    assert_eq!(fixture.window.visible_window(), IndexWindow::new(30, 70));

    // same pointer position, same window: no feedback from the earlier shift
    fixture
        .plot
        .pointer_drag(100.0, 100.0, PointerButton::Secondary);
    assert_eq!(fixture.window.visible_window(), IndexWindow::new(30, 70));

    fixture
        .plot
        .pointer_drag(0.0, 100.0, PointerButton::Secondary);
    assert_eq!(fixture.window.visible_window(), IndexWindow::new(40, 80));

    fixture
        .plot
        .pointer_drag(400.0, 100.0, PointerButton::Secondary);
    assert_eq!(fixture.window.visible_window(), IndexWindow::new(0, 40));

    fixture.plot.pointer_up();
    assert_eq!(fixture.plot.interaction().drag(), None);
}

#[test]
fn drag_from_timeline_strip_is_ignored() {
    let mut fixture = fixture();
    fixture.window.set_visible_window(IndexWindow::new(20, 60));

    fixture
        .plot
        .pointer_down(press(200.0, 190.0, PointerButton::Secondary));
    fixture
        .plot
        .pointer_drag(0.0, 190.0, PointerButton::Secondary);

    assert_eq!(fixture.window.visible_window(), IndexWindow::new(20, 60));
}

#[test]
fn middle_click_on_label_removes_entry() {
    let mut fixture = fixture();

    let miss = fixture
        .plot
        .pointer_down(press(300.0, 195.0, PointerButton::Middle));
    assert_eq!(miss, InputOutcome::None);

    let outcome = fixture
        .plot
        .pointer_down(press(50.0, 195.0, PointerButton::Middle));
    assert_eq!(outcome, InputOutcome::EntryRemoved(ALPHA));
    assert!(fixture.plot.is_empty());
    assert!(fixture.plot.inbox().peek().full_repaint_pending);
}

#[test]
fn middle_click_in_plot_area_asks_for_selected_entry() {
    let mut fixture = fixture();

    let outcome = fixture
        .plot
        .pointer_down(press(100.0, 50.0, PointerButton::Middle));

    assert_eq!(outcome, InputOutcome::AddSelectedEntry);
    assert!(fixture.plot.contains_entry(ALPHA));
}

#[test]
fn primary_press_on_label_starts_entry_drag() {
    let mut fixture = fixture();

    let moved = fixture
        .plot
        .pointer_down(press(50.0, 195.0, PointerButton::Primary));
    assert_eq!(
        moved,
        InputOutcome::EntrySelected {
            entry: ALPHA,
            drag: DragAction::Move,
        }
    );

    let copied = fixture.plot.pointer_down(
        press(50.0, 195.0, PointerButton::Primary).with_modifiers(Modifiers::control()),
    );
    assert_eq!(
        copied,
        InputOutcome::EntrySelected {
            entry: ALPHA,
            drag: DragAction::Copy,
        }
    );
    assert_eq!(fixture.window.snapshot().pending_index, None);
}

#[test]
fn double_click_opens_properties() {
    let mut fixture = fixture();

    let outcome = fixture
        .plot
        .pointer_down(press(100.0, 50.0, PointerButton::Primary).with_click_count(2));

    assert_eq!(outcome, InputOutcome::OpenProperties);
}

#[test]
fn primary_press_is_inert_without_entries_or_on_phase_plot() {
    let mut empty = fixture_with(PlotConfig::default(), 0);
    empty
        .plot
        .pointer_down(press(200.0, 100.0, PointerButton::Primary));
    assert_eq!(empty.window.snapshot().pending_index, None);

    let mut phase = fixture_with(PlotConfig::default().with_graph_type(GraphType::Phase), 2);
    phase
        .plot
        .pointer_down(press(200.0, 100.0, PointerButton::Primary));
    phase
        .plot
        .pointer_drag(300.0, 100.0, PointerButton::Primary);
    assert_eq!(phase.window.snapshot().pending_index, None);
}

#[test]
fn arrow_keys_step_the_cursor() {
    let mut fixture = fixture();

    fixture.plot.key_down(KeyCode::Right);
    fixture.window.apply_pending();
    assert_eq!(fixture.buffer.current_index(), 1);

    fixture.plot.key_down(KeyCode::Left);
    fixture.plot.key_down(KeyCode::Left);
    fixture.window.apply_pending();
    assert_eq!(fixture.buffer.current_index(), 0);
}

#[test]
fn alt_shows_namespaces_while_held() {
    let mut fixture = fixture();

    fixture.plot.key_down(KeyCode::Alt);
    assert!(fixture.plot.config().show_namespaces);
    fixture.plot.flush().expect("flush");
    let frame = fixture
        .plot
        .renderer()
        .last_frame
        .as_ref()
        .expect("frame");
    assert_eq!(frame.texts[0].text, "robot.alpha: 0.0000");

    fixture.plot.key_up(KeyCode::Alt);
    assert!(!fixture.plot.config().show_namespaces);
}

#[test]
fn control_swaps_labels_for_baseline_info() {
    let mut fixture = fixture();
    fixture.plot.set_baselines([1.0, 3.0]).expect("baselines");

    fixture.plot.key_down(KeyCode::Control);
    fixture.plot.flush().expect("flush");

    let frame = fixture
        .plot
        .renderer()
        .last_frame
        .as_ref()
        .expect("frame");
    let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Baselines: ", "1.0000", "3.0000", "     Average = 2.0000"]
    );

    fixture.plot.key_up(KeyCode::Control);
    assert!(!fixture.plot.config().show_baselines_info);
}

#[test]
fn typed_keys_edit_focused_baseline() {
    let mut fixture = fixture();
    fixture.plot.set_baselines([0.0, 0.0]).expect("baselines");

    fixture.plot.key_typed('2');
    assert_eq!(fixture.plot.interaction().focused_baseline(), 1);

    fixture.plot.key_down(KeyCode::Up);
    assert_relative_eq!(fixture.plot.baselines()[1], 0.01);
    assert_eq!(fixture.plot.baselines()[0], 0.0);

    fixture.plot.key_typed('c');
    assert_relative_eq!(fixture.plot.baselines()[1], 0.5);

    fixture.plot.key_down(KeyCode::Down);
    assert_relative_eq!(fixture.plot.baselines()[1], 0.49, epsilon = 1e-12);

    fixture.plot.key_typed('z');
    assert_eq!(fixture.plot.baselines()[1], 0.0);
}
