use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scrub_chart::core::{
    BufferFacade, FixedIndexWindow, IndexWindow, IndexWindowModel, MemoryBuffer,
    SharedIndexWindow,
};
use scrub_chart::error::ChartError;

fn model(length: usize) -> (Arc<MemoryBuffer>, SharedIndexWindow) {
    let buffer = Arc::new(MemoryBuffer::new(length));
    let window = SharedIndexWindow::new(buffer.clone());
    (buffer, window)
}

#[test]
fn new_model_spans_whole_buffer() {
    let (_buffer, window) = model(100);
    assert_eq!(window.visible_window(), IndexWindow::new(0, 99));
    assert_eq!(window.max_index(), 99);
}

#[test]
fn zoom_in_centers_on_cursor() {
    let (buffer, window) = model(100);
    buffer.set_index(50);

    window.zoom_in(2).expect("zoom in");

    assert_eq!(window.visible_window(), IndexWindow::new(25, 74));
}

#[test]
fn zoom_out_past_right_edge_shifts_left() {
    let (buffer, window) = model(100);
    window.set_visible_window(IndexWindow::new(90, 99));
    buffer.set_index(95);

    window.zoom_out(5).expect("zoom out");

    assert_eq!(window.visible_window(), IndexWindow::new(54, 99));
}

#[test]
fn zoom_in_near_left_edge_keeps_width() {
    let (buffer, window) = model(100);
    buffer.set_index(2);

    window.zoom_in(2).expect("zoom in");

    assert_eq!(window.visible_window(), IndexWindow::new(0, 49));
}

#[test]
fn zoom_below_minimum_width_is_ignored() {
    let (buffer, window) = model(100);
    buffer.set_index(50);

    window.zoom_in(30).expect("zoom in");

    assert_eq!(window.visible_window(), IndexWindow::new(0, 99));
}

#[test]
fn zoom_factor_below_one_is_rejected() {
    let (_buffer, window) = model(100);
    assert!(matches!(window.zoom_in(0), Err(ChartError::InvalidData(_))));
    assert!(matches!(window.zoom_out(-2), Err(ChartError::InvalidData(_))));
    assert_eq!(window.visible_window(), IndexWindow::new(0, 99));
}

#[test]
fn recenter_keeps_width_around_cursor() {
    let (buffer, window) = model(200);
    window.set_visible_window(IndexWindow::new(0, 40));
    buffer.set_index(100);

    window.recenter().expect("recenter");

    assert_eq!(window.visible_window(), IndexWindow::new(80, 120));
}

#[test]
fn full_view_restores_whole_buffer() {
    let (buffer, window) = model(100);
    buffer.set_index(70);
    window.zoom_in_default().expect("zoom in");
    window.zoom_in_default().expect("zoom in");
    assert_ne!(window.visible_window(), IndexWindow::new(0, 99));

    window.zoom_full_view();

    assert_eq!(window.visible_window(), IndexWindow::new(0, 99));
}

#[test]
fn buffer_shrink_pulls_right_bound_only() {
    let (buffer, window) = model(100);
    window.set_visible_window(IndexWindow::new(20, 90));

    buffer.set_length(60);
    window.on_buffer_size_changed();

    assert_eq!(window.visible_window(), IndexWindow::new(20, 59));
}

#[test]
fn window_listeners_fire_only_on_change() {
    let (buffer, window) = model(100);
    buffer.set_index(50);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let id = window.attach_window_listener(Arc::new(move |_: IndexWindow| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    window.zoom_in(2).expect("zoom in");
    window.zoom_in(30).expect("ignored zoom");
    window.set_visible_window(IndexWindow::new(25, 74));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(window.detach_window_listener(id));
    window.zoom_full_view();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn set_visible_window_clamps_into_buffer() {
    let (_buffer, window) = model(50);
    window.set_visible_window(IndexWindow::new(-10, 80));
    assert_eq!(window.visible_window(), IndexWindow::new(0, 49));
}

#[test]
fn fixed_window_never_moves() {
    let window = FixedIndexWindow::with_index(30, 12);

    window.zoom_in(2).expect("zoom in");
    window.set_left_plot_index(5);
    window.tick_later(3);
    assert!(!window.apply_pending());

    assert_eq!(window.visible_window(), IndexWindow::new(0, 30));
    assert_eq!(window.current_index(), 12);
    assert_eq!(window.out_point(), 30);
}
