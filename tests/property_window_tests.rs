use std::sync::Arc;

use proptest::prelude::*;
use scrub_chart::core::{
    BufferFacade, IndexWindowModel, MIN_WINDOW_WIDTH, MemoryBuffer, SharedIndexWindow,
};

proptest! {
    #[test]
    fn window_stays_inside_buffer_and_above_min_width(
        length in 5usize..2_000,
        ops in prop::collection::vec((0u8..5, 1i64..6, 0i64..2_000), 0..40)
    ) {
        let buffer = Arc::new(MemoryBuffer::new(length));
        let window = SharedIndexWindow::new(buffer.clone());
        let max_index = length as i64 - 1;

        for (op, factor, index) in ops {
            match op {
                0 => window.zoom_in(factor).expect("zoom in"),
                1 => window.zoom_out(factor).expect("zoom out"),
                2 => window.zoom_full_view(),
                3 => window.recenter().expect("recenter"),
                _ => buffer.set_index(index),
            }

            let visible = window.visible_window();
            prop_assert!(visible.left >= 0);
            prop_assert!(visible.left <= visible.right);
            prop_assert!(visible.right <= max_index);
            prop_assert!(visible.width() >= MIN_WINDOW_WIDTH);
        }
    }

    #[test]
    fn recenter_keeps_width_and_shows_cursor(
        length in 5usize..2_000,
        left_factor in 0.0f64..1.0,
        width_factor in 0.0f64..1.0,
        cursor_factor in 0.0f64..1.0
    ) {
        let buffer = Arc::new(MemoryBuffer::new(length));
        let window = SharedIndexWindow::new(buffer.clone());
        let max_index = length as i64 - 1;

        let width = MIN_WINDOW_WIDTH
            + ((max_index - MIN_WINDOW_WIDTH) as f64 * width_factor) as i64;
        let left = ((max_index - width) as f64 * left_factor) as i64;
        window.set_left_plot_index(left);
        window.set_right_plot_index(left + width);
        let cursor = (max_index as f64 * cursor_factor) as i64;
        buffer.set_index(cursor);

        window.recenter().expect("recenter");

        let visible = window.visible_window();
        prop_assert_eq!(visible.width(), width);
        prop_assert!(visible.contains(cursor));
        prop_assert!(visible.left >= 0 && visible.right <= max_index);
    }

    #[test]
    fn zoom_in_then_full_view_restores_buffer_span(
        length in 5usize..2_000,
        cursor_factor in 0.0f64..1.0,
        factor in 1i64..8
    ) {
        let buffer = Arc::new(MemoryBuffer::new(length));
        let window = SharedIndexWindow::new(buffer.clone());
        buffer.set_index(((length - 1) as f64 * cursor_factor) as i64);

        window.zoom_in(factor).expect("zoom in");
        window.zoom_full_view();

        let visible = window.visible_window();
        prop_assert_eq!(visible.left, 0);
        prop_assert_eq!(visible.right, length as i64 - 1);
    }
}
