use serde::{Deserialize, Serialize};

use crate::core::{EntryId, EntryScaling, TimeIndexWindow, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{PlotConfig, PlotController, PlotDirtyState};

pub const PLOT_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub id: EntryId,
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub scaling: EntryScaling,
}

/// Deterministic view of one plot for diagnostics and regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshot {
    pub viewport: Viewport,
    pub config: PlotConfig,
    pub window: TimeIndexWindow,
    pub entries: Vec<EntrySnapshot>,
    pub aggregate: Option<(f64, f64)>,
    pub pending: PlotDirtyState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: PlotSnapshot,
}

impl<R: Renderer> PlotController<R> {
    #[must_use]
    pub fn snapshot(&self) -> PlotSnapshot {
        PlotSnapshot {
            viewport: self.viewport,
            config: self.config.clone(),
            window: self.window.snapshot(),
            entries: self
                .entries
                .iter()
                .map(|entry| EntrySnapshot {
                    id: entry.id(),
                    name: entry.source().full_name(),
                    min: entry.min(),
                    max: entry.max(),
                    scaling: entry.scaling(),
                })
                .collect(),
            aggregate: self.aggregate,
            pending: self.inbox.peek(),
        }
    }

    /// Serializes the snapshot as pretty JSON wrapped in a versioned contract.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        let payload = PlotSnapshotJsonContractV1 {
            schema_version: PLOT_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.snapshot(),
        };
        serde_json::to_string_pretty(&payload)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

impl PlotSnapshot {
    pub fn from_json_contract_str(input: &str) -> ChartResult<Self> {
        let payload: PlotSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != PLOT_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
