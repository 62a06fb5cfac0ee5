//! Pixel geometry for time plots, phase plots, overlays and labels.
//!
//! Everything here is pure: callers pass the window, viewport and ranges in
//! and get coordinates or primitives back. Coordinates land on pixel centers.

use crate::core::{IndexWindow, LinearScale, SeriesSource, Viewport, snap_to_pixel_center};
use crate::error::ChartResult;
use crate::render::{ColorId, LinePrimitive, PlotLayer, TextPrimitive};

/// Bottom strip kept free of data when the labels fit on one row.
pub const BOTTOM_MARGIN_PX: f64 = 25.0;
pub const TOP_MARGIN_PX: f64 = 5.0;
pub const LABEL_ROW_HEIGHT_PX: f64 = 14.0;
/// Drags starting this close to the bottom edge are ignored.
pub const TIMELINE_DEAD_ZONE_PX: f64 = 16.0;
pub const LABEL_CHAR_WIDTH_PX: f64 = 12.0;
/// Room reserved after each name for its formatted value.
pub const LABEL_VALUE_WIDTH_PX: f64 = 120.0;
pub const LABEL_LEFT_PX: f64 = 3.0;
const LABEL_BASELINE_OFFSET_PX: f64 = 5.0;
const BASELINE_INFO_HEADER_PX: f64 = 80.0;
const BASELINE_INFO_GAP_PX: f64 = 10.0;
const PHASE_SIDE_MARGIN_PX: f64 = 3.0;
const CROSSHAIR_HALF_WIDTH_PX: f64 = 5.0;
const CROSSHAIR_HALF_HEIGHT_PX: f64 = 10.0;
const MIN_SPAN: f64 = 1.0;

/// Row-wrapped placement of the entry labels along the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub widths: Vec<f64>,
    pub rows: Vec<usize>,
    pub total_rows: usize,
}

impl LabelLayout {
    /// Lays out labels whose names have the given character counts.
    #[must_use]
    pub fn compute(name_lengths: impl IntoIterator<Item = usize>, viewport_width: f64) -> Self {
        let mut widths = Vec::new();
        let mut rows = Vec::new();
        let mut row = 0;
        let mut used = 0.0;

        for len in name_lengths {
            let width = LABEL_CHAR_WIDTH_PX * len as f64 + LABEL_VALUE_WIDTH_PX;
            if used != 0.0 && used + width > viewport_width {
                row += 1;
                used = 0.0;
            }
            used += width;
            widths.push(width);
            rows.push(row);
        }

        Self {
            widths,
            rows,
            total_rows: row + 1,
        }
    }

    /// Pixels below the plot area reserved for data-free margin and labels.
    #[must_use]
    pub fn bottom_margin(&self) -> f64 {
        BOTTOM_MARGIN_PX + LABEL_ROW_HEIGHT_PX * (self.total_rows - 1) as f64
    }

    /// Y coordinate where the label rows begin.
    #[must_use]
    pub fn label_area_top(&self, height: f64) -> f64 {
        height - self.total_rows as f64 * LABEL_ROW_HEIGHT_PX
    }

    #[must_use]
    pub fn row_text_y(&self, row: usize, height: f64) -> f64 {
        height
            - LABEL_BASELINE_OFFSET_PX
            - LABEL_ROW_HEIGHT_PX * (self.total_rows - row - 1) as f64
    }

    #[must_use]
    pub fn label_origin(&self, slot: usize, height: f64) -> (f64, f64) {
        let row = self.rows[slot];
        let x = LABEL_LEFT_PX
            + self
                .rows
                .iter()
                .zip(&self.widths)
                .take(slot)
                .filter(|(r, _)| **r == row)
                .map(|(_, w)| *w)
                .sum::<f64>();
        (x, self.row_text_y(row, height))
    }

    /// Slot of the label under `(x, y)`, if any.
    #[must_use]
    pub fn entry_at(&self, x: f64, y: f64, height: f64) -> Option<usize> {
        let top = self.label_area_top(height);
        if y <= top {
            return None;
        }
        let row = ((y - top) / LABEL_ROW_HEIGHT_PX) as usize;

        let mut right_edge = LABEL_LEFT_PX;
        for (slot, (entry_row, width)) in self.rows.iter().zip(&self.widths).enumerate() {
            if *entry_row != row {
                continue;
            }
            right_edge += width;
            if x <= right_edge {
                return Some(slot);
            }
        }
        None
    }
}

/// Index under horizontal pixel `x` for the given window.
#[must_use]
pub fn index_at_x(x: f64, window: IndexWindow, width: f64) -> i64 {
    if width <= 0.0 {
        return window.left;
    }
    window.left + (x / width * window.width() as f64).floor() as i64
}

/// Horizontal pixel of `index` inside `window`.
#[must_use]
pub fn index_to_x(index: i64, window: IndexWindow, width: f64) -> f64 {
    if window.width() == 0 {
        return snap_to_pixel_center(0.0);
    }
    snap_to_pixel_center((index - window.left) as f64 * width / window.width() as f64)
}

/// Index/value to pixel mapping for one entry of a time plot.
#[derive(Debug, Clone, Copy)]
pub struct TimeProjection {
    x_scale: LinearScale,
    y_scale: LinearScale,
    sign: f64,
}

impl TimeProjection {
    /// `min`/`max` is the range the entry is drawn against; inverted entries
    /// are negated before projection.
    pub fn new(
        viewport: Viewport,
        window: IndexWindow,
        bottom_margin: f64,
        min: f64,
        max: f64,
        inverted: bool,
    ) -> ChartResult<Self> {
        let width = f64::from(viewport.width);
        let plot_height = f64::from(viewport.height) - bottom_margin - TOP_MARGIN_PX;
        let x_scale = LinearScale::widened(
            window.left as f64,
            window.right as f64,
            MIN_SPAN,
            0.0,
            width,
        )?;
        let y_scale = LinearScale::widened(
            min,
            max,
            MIN_SPAN,
            TOP_MARGIN_PX + plot_height,
            TOP_MARGIN_PX,
        )?;
        Ok(Self {
            x_scale,
            y_scale,
            sign: if inverted { -1.0 } else { 1.0 },
        })
    }

    #[must_use]
    pub fn x(&self, index: i64) -> f64 {
        snap_to_pixel_center(self.x_scale.domain_to_pixel(index as f64))
    }

    #[must_use]
    pub fn y(&self, value: f64) -> f64 {
        snap_to_pixel_center(self.y_scale.domain_to_pixel(self.sign * value))
    }

    /// Baselines are drawn in the entry's range but are never negated.
    #[must_use]
    pub fn baseline_y(&self, value: f64) -> f64 {
        self.y_scale.domain_to_pixel(value)
    }

    /// Polyline for `values` starting at buffer index `from`.
    #[must_use]
    pub fn polyline(&self, from: i64, values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        values
            .iter()
            .zip(from..)
            .map(|(value, index)| (self.x(index), self.y(*value)))
            .unzip()
    }
}

/// Value/value to pixel mapping for one phase pair.
#[derive(Debug, Clone, Copy)]
pub struct PhaseProjection {
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl PhaseProjection {
    pub fn new(
        viewport: Viewport,
        bottom_margin: f64,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> ChartResult<Self> {
        let width = f64::from(viewport.width);
        let plot_height = f64::from(viewport.height) - bottom_margin - TOP_MARGIN_PX;
        let x_scale = LinearScale::widened(
            x_range.0,
            x_range.1,
            MIN_SPAN,
            PHASE_SIDE_MARGIN_PX,
            width - PHASE_SIDE_MARGIN_PX,
        )?;
        let y_scale = LinearScale::widened(
            y_range.0,
            y_range.1,
            MIN_SPAN,
            TOP_MARGIN_PX + plot_height,
            TOP_MARGIN_PX,
        )?;
        Ok(Self { x_scale, y_scale })
    }

    #[must_use]
    pub fn scatter(&self, xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| {
                (
                    self.x_scale.domain_to_pixel(*x),
                    self.y_scale.domain_to_pixel(*y),
                )
            })
            .unzip()
    }

    /// Cross marker centred on the sample at the cursor.
    #[must_use]
    pub fn crosshair(&self, layer: PlotLayer, x_value: f64, y_value: f64) -> [LinePrimitive; 2] {
        let x = self.x_scale.domain_to_pixel(x_value);
        let y = self.y_scale.domain_to_pixel(y_value);
        [
            LinePrimitive::new(
                layer,
                x - CROSSHAIR_HALF_WIDTH_PX,
                y,
                x + CROSSHAIR_HALF_WIDTH_PX,
                y,
                ColorId::Cursor,
            ),
            LinePrimitive::new(
                layer,
                x,
                y - CROSSHAIR_HALF_HEIGHT_PX,
                x,
                y + CROSSHAIR_HALF_HEIGHT_PX,
                ColorId::Cursor,
            ),
        ]
    }
}

/// Input the index overlay is drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOverlayInput {
    pub window: IndexWindow,
    pub current_index: i64,
    pub in_point: i64,
    pub out_point: i64,
    pub key_points: Vec<i64>,
}

/// Vertical in/out point, key point and cursor lines.
#[must_use]
pub fn index_lines(input: &IndexOverlayInput, width: f64, height: f64) -> Vec<LinePrimitive> {
    let window = input.window;
    let vertical = |index: i64, color: ColorId| {
        let x = index_to_x(index, window, width);
        LinePrimitive::new(PlotLayer::Index, x, 0.0, x, height, color)
    };

    let mut lines = Vec::with_capacity(input.key_points.len() + 3);
    if input.in_point >= window.left {
        lines.push(vertical(input.in_point, ColorId::InPoint));
    }
    if input.out_point <= window.right {
        lines.push(vertical(input.out_point, ColorId::OutPoint));
    }
    lines.extend(
        input
            .key_points
            .iter()
            .filter(|key| window.contains(**key))
            .map(|key| vertical(*key, ColorId::KeyPoint)),
    );
    lines.push(vertical(input.current_index, ColorId::Cursor));
    lines
}

/// Label text for one entry: name plus its value at the cursor.
///
/// Past the out point the last recorded value (`out_point - 1`) is shown.
#[must_use]
pub fn entry_label(
    source: &dyn SeriesSource,
    show_namespace: bool,
    current_index: i64,
    out_point: i64,
) -> String {
    let mut text = if show_namespace {
        source.full_name()
    } else {
        source.name().to_owned()
    };

    let sample = if current_index < out_point {
        Some(current_index)
    } else if out_point > 0 {
        Some(out_point - 1)
    } else {
        None
    };
    let value = sample
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| source.value_at(index));
    if let Some(value) = value {
        text.push_str(&format!(": {value:.4}"));
    }
    text
}

/// Baseline values and their average on the first label row.
#[must_use]
pub fn baseline_info_texts(baselines: &[f64], y: f64) -> Vec<TextPrimitive> {
    if baselines.is_empty() {
        return Vec::new();
    }

    let mut texts = Vec::with_capacity(baselines.len() + 2);
    texts.push(TextPrimitive::new(
        PlotLayer::Info,
        "Baselines: ",
        LABEL_LEFT_PX,
        y,
        ColorId::Label,
    ));

    let mut x = LABEL_LEFT_PX + BASELINE_INFO_HEADER_PX;
    for (slot, value) in baselines.iter().enumerate() {
        let text = format!("{value:.4}");
        let advance = LABEL_CHAR_WIDTH_PX * text.len() as f64 + BASELINE_INFO_GAP_PX;
        texts.push(TextPrimitive::new(
            PlotLayer::Info,
            text,
            x,
            y,
            ColorId::Baseline(slot as u8),
        ));
        x += advance;
    }

    let average = baselines.iter().sum::<f64>() / baselines.len() as f64;
    texts.push(TextPrimitive::new(
        PlotLayer::Info,
        format!("     Average = {average:.4}"),
        x,
        y,
        ColorId::Label,
    ));
    texts
}
