use std::sync::Arc;

use scrub_chart::api::{PLOT_SNAPSHOT_JSON_SCHEMA_V1, PlotConfig, PlotSnapshot, ScaleType};
use scrub_chart::core::{
    EntryId, IndexWindow, IndexWindowModel, MemoryBuffer, MemorySeries, SharedIndexWindow,
    Viewport,
};
use scrub_chart::render::NullRenderer;
use scrub_chart::{ChartError, PlotController};

fn plot() -> (Arc<SharedIndexWindow>, PlotController<NullRenderer>) {
    let buffer = Arc::new(MemoryBuffer::new(64));
    let window = Arc::new(SharedIndexWindow::new(buffer));
    let config = PlotConfig::default()
        .with_scale_type(ScaleType::Individual)
        .with_baselines([0.5]);
    let mut plot = PlotController::with_config(
        NullRenderer::default(),
        window.clone(),
        Viewport::new(640, 240),
        config,
    )
    .expect("plot init");
    let series = MemorySeries::new(EntryId::new(4), "yaw", vec![-1.0, 2.5, 0.0])
        .with_namespace("imu");
    plot.add_entry(Arc::new(series));
    (window, plot)
}

#[test]
fn snapshot_reports_entries_window_and_pending_work() {
    let (window, mut plot) = plot();
    plot.flush().expect("flush");
    window.tick_later(3);
    plot.inbox().request_entry_range(EntryId::new(4), 0, 3);

    let snapshot = plot.snapshot();

    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].name, "imu.yaw");
    assert_eq!((snapshot.entries[0].min, snapshot.entries[0].max), (-1.0, 2.5));
    assert_eq!(snapshot.aggregate, Some((-1.0, 2.5)));
    assert_eq!(snapshot.window.pending_tick, 3);
    assert_eq!(snapshot.window.max_index, 63);
    assert_eq!(
        snapshot.pending.entry_ranges.get(&EntryId::new(4)).map(|r| r.count()),
        Some(3)
    );
    assert!(!snapshot.pending.full_repaint_pending);
}

#[test]
fn snapshot_json_roundtrip() {
    let (window, plot) = plot();
    window.set_visible_window(IndexWindow::new(8, 40));

    let json = plot.snapshot_json_pretty().expect("snapshot should serialize");
    let decoded = PlotSnapshot::from_json_contract_str(&json).expect("snapshot should decode");

    assert_eq!(decoded, plot.snapshot());
    assert_eq!(decoded.window.left_plot_index, 8);
    assert_eq!(decoded.config.baselines.as_slice(), &[0.5]);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let (_window, plot) = plot();
    let json = plot.snapshot_json_pretty().expect("snapshot should serialize");
    let bumped = json.replacen(
        &format!("\"schema_version\": {PLOT_SNAPSHOT_JSON_SCHEMA_V1}"),
        "\"schema_version\": 99",
        1,
    );

    assert!(matches!(
        PlotSnapshot::from_json_contract_str(&bumped),
        Err(ChartError::InvalidData(_))
    ));
    assert!(matches!(
        PlotSnapshot::from_json_contract_str("{"),
        Err(ChartError::InvalidData(_))
    ));
}
