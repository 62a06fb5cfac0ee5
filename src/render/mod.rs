mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use layer_stack::{PlotLayer, PlotLayerStack};
pub use null_renderer::NullRenderer;
pub use primitives::{ClearPrimitive, ColorId, LinePrimitive, SeriesPrimitive, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` holding only the work
/// the scheduler decided was stale, so drawing code stays isolated from
/// window and invalidation logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

/// Immediate-mode drawing calls, for backends that rasterize as they go.
pub trait DrawBackend {
    fn draw_series(
        &mut self,
        layer: PlotLayer,
        color: ColorId,
        xs: &[f64],
        ys: &[f64],
    ) -> ChartResult<()>;

    fn clear_region(
        &mut self,
        layer: PlotLayer,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> ChartResult<()>;

    fn draw_text(
        &mut self,
        layer: PlotLayer,
        text: &str,
        x: f64,
        y: f64,
        color: ColorId,
    ) -> ChartResult<()>;

    fn draw_line(
        &mut self,
        layer: PlotLayer,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: ColorId,
    ) -> ChartResult<()>;
}

/// Adapts a [`DrawBackend`] to the frame-based [`Renderer`] contract.
#[derive(Debug, Default)]
pub struct BackendRenderer<B> {
    backend: B,
}

impl<B: DrawBackend> BackendRenderer<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: DrawBackend> Renderer for BackendRenderer<B> {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        frame.replay(&mut self.backend)
    }
}
