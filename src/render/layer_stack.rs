use serde::{Deserialize, Serialize};

/// Canvas a primitive targets. Each entry slot owns a data and a baseline
/// layer so one entry can be cleared and redrawn without touching the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotLayer {
    Data(u8),
    Baseline(u8),
    Info,
    Index,
}

/// Bottom-to-top layer order for a plot with `slots` entry slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotLayerStack {
    pub layers: Vec<PlotLayer>,
}

impl PlotLayerStack {
    #[must_use]
    pub fn canonical(slots: u8) -> Self {
        let mut layers: Vec<PlotLayer> = (0..slots)
            .flat_map(|slot| [PlotLayer::Data(slot), PlotLayer::Baseline(slot)])
            .collect();
        layers.push(PlotLayer::Info);
        layers.push(PlotLayer::Index);
        Self { layers }
    }
}
