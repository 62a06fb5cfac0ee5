use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ClearPrimitive, DrawBackend, LinePrimitive, PlotLayer, SeriesPrimitive, TextPrimitive,
};

/// Backend-agnostic draw work for one plot flush.
///
/// Only the layers named by `touched_layers` changed; everything else on the
/// backend's canvases stays as it was drawn by earlier frames.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub clears: Vec<ClearPrimitive>,
    pub series: Vec<SeriesPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            clears: Vec::new(),
            series: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clear(mut self, clear: ClearPrimitive) -> Self {
        self.clears.push(clear);
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: SeriesPrimitive) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for clear in &self.clears {
            clear.validate()?;
        }
        for series in &self.series {
            series.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clears.is_empty()
            && self.series.is_empty()
            && self.lines.is_empty()
            && self.texts.is_empty()
    }

    /// Layers written by this frame, in first-touch order.
    #[must_use]
    pub fn touched_layers(&self) -> Vec<PlotLayer> {
        let mut layers = Vec::new();
        let all = self
            .clears
            .iter()
            .map(|clear| clear.layer)
            .chain(self.series.iter().map(|series| series.layer))
            .chain(self.lines.iter().map(|line| line.layer))
            .chain(self.texts.iter().map(|text| text.layer));
        for layer in all {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        layers
    }

    /// Replays the frame as draw calls; clears run before any stroke.
    pub fn replay<B: DrawBackend + ?Sized>(&self, backend: &mut B) -> ChartResult<()> {
        for clear in &self.clears {
            backend.clear_region(clear.layer, clear.x, clear.y, clear.width, clear.height)?;
        }
        for series in &self.series {
            backend.draw_series(series.layer, series.color, &series.xs, &series.ys)?;
        }
        for line in &self.lines {
            backend.draw_line(line.layer, line.x1, line.y1, line.x2, line.y2, line.color)?;
        }
        for text in &self.texts {
            backend.draw_text(text.layer, &text.text, text.x, text.y, text.color)?;
        }
        Ok(())
    }
}
