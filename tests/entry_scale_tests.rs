use std::sync::Arc;

use approx::assert_relative_eq;
use scrub_chart::api::{MAX_ENTRIES_PER_PLOT, PlotConfig, ScaleType};
use scrub_chart::core::{
    EntryId, EntryScaling, MemoryBuffer, MemorySeries, SharedIndexWindow, Viewport,
};
use scrub_chart::render::NullRenderer;
use scrub_chart::{ChartError, PlotController};

fn plot() -> PlotController<NullRenderer> {
    let buffer = Arc::new(MemoryBuffer::new(50));
    let window = Arc::new(SharedIndexWindow::new(buffer));
    PlotController::new(NullRenderer::default(), window, Viewport::new(300, 150))
        .expect("plot init")
}

fn series(id: u64, samples: Vec<f64>) -> Arc<MemorySeries> {
    Arc::new(MemorySeries::new(
        EntryId::new(id),
        format!("q{id}"),
        samples,
    ))
}

#[test]
fn plot_holds_at_most_ten_entries() {
    let mut plot = plot();
    for id in 0..MAX_ENTRIES_PER_PLOT as u64 {
        assert!(plot.add_entry(series(id, vec![0.0, 1.0])));
    }

    assert!(!plot.add_entry(series(99, vec![0.0, 1.0])));
    assert_eq!(plot.entries().len(), MAX_ENTRIES_PER_PLOT);
    assert!(!plot.contains_entry(EntryId::new(99)));
}

#[test]
fn duplicate_entry_is_rejected() {
    let mut plot = plot();
    let source = series(1, vec![0.0, 1.0]);

    assert!(plot.add_entry(source.clone()));
    assert!(!plot.add_entry(source));
    assert_eq!(plot.entry_ids(), vec![EntryId::new(1)]);
}

#[test]
fn bounds_for_missing_entry_are_an_error() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 1.0]));

    let missing = EntryId::new(5);
    assert!(matches!(
        plot.min_for(missing),
        Err(ChartError::EntryNotOnPlot(id)) if id == missing
    ));
    assert!(matches!(
        plot.max_for(missing),
        Err(ChartError::EntryNotOnPlot(_))
    ));
}

#[test]
fn inverted_entry_mirrors_shared_range() {
    let mut plot = plot();
    let inverted = EntryScaling {
        inverted: true,
        ..EntryScaling::default()
    };
    assert!(
        plot.add_entry_with_scaling(series(1, vec![2.0, 10.0, 6.0]), inverted)
            .expect("valid scaling")
    );

    assert_eq!(plot.aggregate_range(), Some((-10.0, -2.0)));
    assert_eq!(plot.min_for(EntryId::new(1)).expect("min"), -10.0);
    assert_eq!(plot.max_for(EntryId::new(1)).expect("max"), -2.0);

    plot.add_entry(series(2, vec![-4.0, 0.0]));
    assert_eq!(plot.aggregate_range(), Some((-10.0, 0.0)));
}

#[test]
fn scale_modes_pick_their_range() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 4.0]));
    plot.add_entry(series(2, vec![-2.0, 1.0]));
    let first = EntryId::new(1);

    assert_eq!(plot.min_for(first).expect("auto min"), -2.0);
    assert_eq!(plot.max_for(first).expect("auto max"), 4.0);

    plot.set_scale_type(ScaleType::Individual)
        .expect("individual");
    assert_eq!(plot.min_for(first).expect("individual min"), 0.0);

    plot.set_manual_range(-1.0, 1.0).expect("manual range");
    assert_eq!(plot.config().scale_type, ScaleType::Manual);
    assert_eq!(plot.min_for(first).expect("manual min"), -1.0);
    assert_eq!(plot.max_for(first).expect("manual max"), 1.0);
}

#[test]
fn manual_scale_needs_a_valid_range() {
    let mut plot = plot();

    assert!(matches!(
        plot.set_scale_type(ScaleType::Manual),
        Err(ChartError::InvalidManualScale { .. })
    ));
    assert_eq!(plot.config().scale_type, ScaleType::Auto);

    assert!(plot.set_manual_range(3.0, 3.0).is_err());
    assert!(plot.set_manual_range(f64::NAN, 1.0).is_err());
    assert!(
        plot.set_config(PlotConfig::default().with_manual_range(5.0, 1.0))
            .is_err()
    );
    assert_eq!(plot.config(), &PlotConfig::default());
}

#[test]
fn entry_manual_scaling_is_validated() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 1.0]));
    let bad = EntryScaling {
        auto_scale_enabled: false,
        manual_min: 2.0,
        manual_max: 2.0,
        ..EntryScaling::default()
    };

    assert!(matches!(
        plot.set_entry_scaling(EntryId::new(1), bad),
        Err(ChartError::InvalidManualScale { .. })
    ));
    assert!(matches!(
        plot.set_entry_scaling(EntryId::new(9), EntryScaling::default()),
        Err(ChartError::EntryNotOnPlot(_))
    ));

    let fixed = EntryScaling {
        auto_scale_enabled: false,
        manual_min: -5.0,
        manual_max: 5.0,
        ..EntryScaling::default()
    };
    plot.set_entry_scaling(EntryId::new(1), fixed)
        .expect("entry scaling");
    assert_eq!(plot.aggregate_range(), Some((-5.0, 5.0)));
}

#[test]
fn entry_added_with_flat_manual_range_is_rejected() {
    let mut plot = plot();
    let flat = EntryScaling {
        auto_scale_enabled: false,
        manual_min: 3.0,
        manual_max: 3.0,
        ..EntryScaling::default()
    };

    assert!(matches!(
        plot.add_entry_with_scaling(series(1, vec![0.0, 1.0]), flat),
        Err(ChartError::InvalidManualScale { min, max }) if min == 3.0 && max == 3.0
    ));
    assert!(plot.is_empty());
    assert_eq!(plot.aggregate_range(), None);

    let flat_but_auto = EntryScaling {
        auto_scale_enabled: true,
        ..flat
    };
    assert!(
        plot.add_entry_with_scaling(series(1, vec![0.0, 1.0]), flat_but_auto)
            .expect("auto scaling ignores manual bounds")
    );
}

#[test]
fn baselines_follow_plot_range() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 10.0]));
    plot.set_baselines([1.0, 2.0]).expect("baselines");

    plot.increment_baseline(0, 1.0);
    assert_relative_eq!(plot.baselines()[0], 1.1, epsilon = 1e-12);

    plot.increment_baseline(1, -10.0);
    assert_relative_eq!(plot.baselines()[1], 1.0, epsilon = 1e-12);

    plot.center_baseline(1);
    assert_relative_eq!(plot.baselines()[1], 5.0);

    // out-of-range slots fall back to the first baseline
    plot.zero_baseline(5);
    assert_eq!(plot.baselines()[0], 0.0);
    assert_relative_eq!(plot.baselines()[1], 5.0);
}

#[test]
fn baseline_edits_without_baselines_are_ignored() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 10.0]));

    plot.increment_baseline(0, 1.0);
    plot.center_baseline(2);
    assert!(plot.baselines().is_empty());
}

#[test]
fn too_many_baselines_are_rejected() {
    let mut plot = plot();

    assert!(matches!(
        plot.set_baselines([0.0; 7]),
        Err(ChartError::TooManyBaselines { count: 7, max: 6 })
    ));
    assert!(plot.baselines().is_empty());
}

#[test]
fn zero_sized_viewport_is_rejected() {
    let mut plot = plot();

    assert!(matches!(
        plot.set_viewport(Viewport::new(0, 100)),
        Err(ChartError::InvalidViewport { width: 0, height: 100 })
    ));
    assert_eq!(plot.viewport(), Viewport::new(300, 150));
}

#[test]
fn removing_entries_updates_shared_range() {
    let mut plot = plot();
    plot.add_entry(series(1, vec![0.0, 10.0]));
    plot.add_entry(series(2, vec![-3.0, 1.0]));

    assert!(plot.remove_entry(EntryId::new(1)));
    assert!(!plot.remove_entry(EntryId::new(1)));
    assert_eq!(plot.aggregate_range(), Some((-3.0, 1.0)));

    plot.clear_entries();
    assert!(plot.is_empty());
    assert_eq!(plot.aggregate_range(), None);
}
