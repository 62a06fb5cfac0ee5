use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::PlotLayer;

fn ensure_finite(what: &str, values: &[f64]) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

/// Palette slot resolved to a concrete color by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorId {
    Series(u8),
    Baseline(u8),
    InPoint,
    OutPoint,
    KeyPoint,
    Cursor,
    Label,
}

/// Polyline for one entry (or one phase pair) in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPrimitive {
    pub layer: PlotLayer,
    pub color: ColorId,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SeriesPrimitive {
    #[must_use]
    pub fn new(layer: PlotLayer, color: ColorId, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self {
            layer,
            color,
            xs,
            ys,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.xs.len() != self.ys.len() {
            return Err(ChartError::InvalidData(format!(
                "series coordinate lengths differ: xs={}, ys={}",
                self.xs.len(),
                self.ys.len()
            )));
        }
        ensure_finite("series x coordinates", &self.xs)?;
        ensure_finite("series y coordinates", &self.ys)
    }
}

/// Clears a rectangle of one layer before it is redrawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearPrimitive {
    pub layer: PlotLayer,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClearPrimitive {
    #[must_use]
    pub const fn new(layer: PlotLayer, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            layer,
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite("clear region", &[self.x, self.y, self.width, self.height])?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "clear region size must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Straight segment: overlay markers, baselines and the phase crosshair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub layer: PlotLayer,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: ColorId,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(
        layer: PlotLayer,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: ColorId,
    ) -> Self {
        Self {
            layer,
            x1,
            y1,
            x2,
            y2,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite("line endpoints", &[self.x1, self.y1, self.x2, self.y2])
    }
}

/// Label or baseline-info text anchored at its baseline-left point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub layer: PlotLayer,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: ColorId,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(layer: PlotLayer, text: impl Into<String>, x: f64, y: f64, color: ColorId) -> Self {
        Self {
            layer,
            text: text.into(),
            x,
            y,
            color,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(format!(
                "empty label on {:?}",
                self.layer
            )));
        }
        ensure_finite("label anchor", &[self.x, self.y])
    }
}
