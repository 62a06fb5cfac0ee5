mod config;
mod entry_controller;
mod input_controller;
mod invalidation;
mod plot;
mod plot_group;
pub mod plot_geometry;
mod repaint_scheduler;
mod scale_controller;
mod snapshot;

pub use config::{
    Baselines, GraphType, MAX_BASELINES, MAX_ENTRIES_PER_PLOT, PlotConfig, ScaleType,
};
pub use invalidation::{DirtyRange, PlotDirtyState, PlotInbox};
pub use plot::PlotController;
pub use plot_group::{DeletionListener, GroupFrameReport, PlotGroup};
pub use repaint_scheduler::{EntryRepaint, FlushReport};
pub use snapshot::{
    EntrySnapshot, PLOT_SNAPSHOT_JSON_SCHEMA_V1, PlotSnapshot, PlotSnapshotJsonContractV1,
};
