use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{EntryId, IndexWindow, PlottedEntry};
use crate::error::ChartResult;
use crate::render::{ClearPrimitive, ColorId, LinePrimitive, PlotLayer, RenderFrame, Renderer};
use crate::render::{SeriesPrimitive, TextPrimitive};

use super::invalidation::{DirtyRange, PlotDirtyState};
use super::plot_geometry::{
    IndexOverlayInput, LabelLayout, PhaseProjection, TimeProjection, baseline_info_texts,
    entry_label, index_lines,
};
use super::{GraphType, PlotController, ScaleType};

/// One entry redrawn over `[from, from + count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRepaint {
    pub entry: EntryId,
    pub from: i64,
    pub count: i64,
}

/// What one flush redrew.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlushReport {
    pub removed: Vec<EntryId>,
    pub index_overlay: bool,
    pub label_overlay: bool,
    /// Window of a full repaint, if one ran.
    pub full_repaint: Option<IndexWindow>,
    /// A partial flush turned into a full one because the shared range moved.
    pub escalated: bool,
    pub entry_repaints: Vec<EntryRepaint>,
    pub rendered: bool,
}

impl FlushReport {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.rendered
    }
}

fn clip(window: IndexWindow, visible: IndexWindow) -> IndexWindow {
    let left = window.left.max(visible.left);
    let right = window.right.min(visible.right);
    if left > right {
        visible
    } else {
        IndexWindow::new(left, right)
    }
}

/// Splits a projected polyline at non-finite samples; single-point runs are
/// kept so isolated samples still show.
fn finite_runs(xs: &[f64], ys: &[f64]) -> Vec<(Vec<f64>, Vec<f64>)> {
    let mut runs = Vec::new();
    let mut run: (Vec<f64>, Vec<f64>) = (Vec::new(), Vec::new());
    for (x, y) in xs.iter().zip(ys) {
        if y.is_finite() {
            run.0.push(*x);
            run.1.push(*y);
        } else if !run.0.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.0.is_empty() {
        runs.push(run);
    }
    runs
}

/// Samples `[0, samples)` of `entry`, negated when the entry is inverted.
fn signed_values(entry: &PlottedEntry, samples: usize) -> Vec<f64> {
    let values = entry.source().values(0, samples);
    if entry.inverted() {
        values.into_iter().map(|value| -value).collect()
    } else {
        values
    }
}

impl<R: Renderer> PlotController<R> {
    /// Redraws exactly what went stale since the last flush and hands the
    /// result to the renderer as one frame.
    ///
    /// Requests arriving while the flush runs are kept for the next one. A
    /// failed flush re-queues a full repaint so the drained work is not lost.
    pub fn flush(&mut self) -> ChartResult<FlushReport> {
        let dirty = self.inbox.drain();
        self.flush_dirty(dirty).inspect_err(|error| {
            warn!(error = %error, "plot flush failed; full repaint re-queued");
            self.request_full_repaint(true);
        })
    }

    fn flush_dirty(&mut self, mut dirty: PlotDirtyState) -> ChartResult<FlushReport> {
        let mut report = FlushReport::default();
        let visible = self.window.visible_window();

        for entry in std::mem::take(&mut dirty.pending_removals) {
            if self.detach_entry(entry) {
                report.removed.push(entry);
            }
        }
        if !report.removed.is_empty() {
            dirty.request_full_repaint(visible, true);
            dirty.label_overlay_dirty = true;
        }

        let phase = self.config.graph_type == GraphType::Phase;
        if phase && dirty.index_overlay_dirty {
            // the phase crosshair lives on the data layers
            dirty.request_full_repaint(visible, false);
        }

        let layout = self.label_layout();
        let mut frame = RenderFrame::new(self.viewport);

        if dirty.index_overlay_dirty {
            self.draw_index_overlay(&mut frame, &layout, visible);
            report.index_overlay = true;
        }

        if dirty.full_repaint_pending {
            let requested = dirty.pending_window.unwrap_or(visible);
            let window = if phase {
                self.draw_phase_plot(&mut frame, &layout)?;
                visible
            } else {
                self.draw_full_time_plot(
                    &mut frame,
                    &layout,
                    visible,
                    requested,
                    dirty.override_scale,
                    &mut report,
                )?
            };
            report.full_repaint = Some(window);
            dirty.label_overlay_dirty = true;
        } else if !dirty.entry_ranges.is_empty() {
            let escalated =
                self.draw_entry_ranges(&mut frame, &layout, visible, &dirty.entry_ranges, &mut report)?;
            if escalated {
                report.escalated = true;
                report.full_repaint = Some(visible);
                dirty.label_overlay_dirty = true;
            }
        }

        if dirty.label_overlay_dirty {
            self.draw_labels(&mut frame, &layout);
            report.label_overlay = true;
        }

        if !frame.is_empty() {
            self.renderer.render(&frame)?;
            report.rendered = true;
        }
        trace!(
            full = ?report.full_repaint,
            partial = report.entry_repaints.len(),
            index = report.index_overlay,
            labels = report.label_overlay,
            "plot flushed"
        );
        Ok(report)
    }

    fn draw_index_overlay(&self, frame: &mut RenderFrame, layout: &LabelLayout, visible: IndexWindow) {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        frame
            .clears
            .push(ClearPrimitive::new(PlotLayer::Index, 0.0, 0.0, width, height));
        if self.config.graph_type == GraphType::Phase {
            return;
        }

        let input = IndexOverlayInput {
            window: visible,
            current_index: self.window.current_index(),
            in_point: self.window.in_point(),
            out_point: self.window.out_point(),
            key_points: self.window.key_points(),
        };
        frame
            .lines
            .extend(index_lines(&input, width, height - layout.bottom_margin()));
    }

    fn clear_stale_slots(&mut self, frame: &mut RenderFrame) {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        for slot in self.entries.len()..self.drawn_slots {
            let slot = slot as u8;
            for layer in [PlotLayer::Data(slot), PlotLayer::Baseline(slot)] {
                frame
                    .clears
                    .push(ClearPrimitive::new(layer, 0.0, 0.0, width, height));
            }
        }
        self.drawn_slots = self.entries.len();
    }

    /// Full TIME repaint; returns the window that was redrawn.
    fn draw_full_time_plot(
        &mut self,
        frame: &mut RenderFrame,
        layout: &LabelLayout,
        visible: IndexWindow,
        requested: IndexWindow,
        override_scale: bool,
        report: &mut FlushReport,
    ) -> ChartResult<IndexWindow> {
        let mut scale_changed = override_scale;
        if override_scale || self.config.scale_type == ScaleType::Auto {
            for entry in &mut self.entries {
                if entry.has_min_max_changed() {
                    entry.recompute_min_max();
                    scale_changed = true;
                }
            }
            self.recompute_aggregate();
        }

        let window = if scale_changed {
            visible
        } else {
            clip(requested, visible)
        };

        self.clear_stale_slots(frame);
        for slot in 0..self.entries.len() {
            if let Some(repaint) = self.draw_time_entry(frame, layout, slot, window, visible)? {
                report.entry_repaints.push(repaint);
            }
        }
        Ok(window)
    }

    /// Partial TIME repaint; returns `true` when it escalated to a full one.
    ///
    /// Every batched entry whose bounds moved is recomputed before the shared
    /// range is compared, so an escalation never draws against stale bounds.
    fn draw_entry_ranges(
        &mut self,
        frame: &mut RenderFrame,
        layout: &LabelLayout,
        visible: IndexWindow,
        ranges: &IndexMap<EntryId, DirtyRange>,
        report: &mut FlushReport,
    ) -> ChartResult<bool> {
        let mut rescaled = Vec::new();
        for entry in ranges.keys() {
            let Some(slot) = self.entry_slot(*entry) else {
                continue;
            };
            if self.entries[slot].has_min_max_changed() {
                self.entries[slot].recompute_min_max();
                rescaled.push(*entry);
            }
        }

        if !rescaled.is_empty() && self.config.scale_type == ScaleType::Auto {
            let before = self.aggregate;
            self.recompute_aggregate();
            if self.aggregate != before {
                debug!(
                    rescaled = rescaled.len(),
                    "shared range moved; repainting every entry"
                );
                self.clear_stale_slots(frame);
                for slot in 0..self.entries.len() {
                    if let Some(repaint) =
                        self.draw_time_entry(frame, layout, slot, visible, visible)?
                    {
                        report.entry_repaints.push(repaint);
                    }
                }
                return Ok(true);
            }
        }

        for (entry, range) in ranges {
            let Some(slot) = self.entry_slot(*entry) else {
                continue;
            };

            let window = if rescaled.contains(entry) {
                visible
            } else {
                let from = range.from.max(visible.left);
                let to = range.to.min(visible.right + 1);
                if to - from < 2 {
                    continue;
                }
                IndexWindow::new(from, to - 1)
            };

            if let Some(repaint) = self.draw_time_entry(frame, layout, slot, window, visible)? {
                report.entry_repaints.push(repaint);
            }
        }
        Ok(false)
    }

    /// Draws one entry over `window` (inclusive) projected into `visible`.
    fn draw_time_entry(
        &self,
        frame: &mut RenderFrame,
        layout: &LabelLayout,
        slot: usize,
        window: IndexWindow,
        visible: IndexWindow,
    ) -> ChartResult<Option<EntryRepaint>> {
        let entry = &self.entries[slot];
        let source = entry.source();
        let layer = PlotLayer::Data(slot as u8);
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let whole_window = window == visible;

        if whole_window {
            frame
                .clears
                .push(ClearPrimitive::new(layer, 0.0, 0.0, width, height));
        }

        let (min, max) = self.range_for_slot(slot);
        let projection = TimeProjection::new(
            self.viewport,
            visible,
            layout.bottom_margin(),
            min,
            max,
            entry.inverted(),
        )?;

        if self.config.show_baselines {
            let base_layer = PlotLayer::Baseline(slot as u8);
            frame
                .clears
                .push(ClearPrimitive::new(base_layer, 0.0, 0.0, width, height));
            for (index, baseline) in self.config.baselines.iter().enumerate() {
                let y = projection.baseline_y(*baseline);
                frame.lines.push(LinePrimitive::new(
                    base_layer,
                    0.0,
                    y,
                    width,
                    y,
                    ColorId::Baseline(index as u8),
                ));
            }
        }

        let from = window.left.max(0);
        let to = (window.right + 1).min(source.len() as i64);
        if to - from < 2 {
            return Ok(None);
        }

        let values = source.values(from as usize, to as usize);
        if values.len() < 2 {
            return Ok(None);
        }
        let (xs, ys) = projection.polyline(from, &values);
        if !whole_window {
            let left = xs[0];
            let right = xs[xs.len() - 1];
            frame
                .clears
                .push(ClearPrimitive::new(layer, left, 0.0, right - left, height));
        }
        let count = xs.len() as i64;
        for (run_xs, run_ys) in finite_runs(&xs, &ys) {
            frame.series.push(SeriesPrimitive::new(
                layer,
                ColorId::Series(slot as u8),
                run_xs,
                run_ys,
            ));
        }

        Ok(Some(EntryRepaint {
            entry: entry.id(),
            from,
            count,
        }))
    }

    /// Scatter of each `(2i, 2i + 1)` entry pair with a crosshair at the
    /// cursor; an unpaired trailing entry is not drawn.
    fn draw_phase_plot(&mut self, frame: &mut RenderFrame, layout: &LabelLayout) -> ChartResult<()> {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);

        for entry in &mut self.entries {
            if entry.has_min_max_changed() {
                entry.recompute_min_max();
            }
        }
        self.recompute_aggregate();

        let slots = self.entries.len().max(self.drawn_slots);
        for slot in 0..slots {
            let slot = slot as u8;
            for layer in [PlotLayer::Data(slot), PlotLayer::Baseline(slot)] {
                frame
                    .clears
                    .push(ClearPrimitive::new(layer, 0.0, 0.0, width, height));
            }
        }
        self.drawn_slots = self.entries.len();

        let current_index = self.window.current_index();
        for (pair, entries) in self.entries.chunks_exact(2).enumerate() {
            let (x_entry, y_entry) = (&entries[0], &entries[1]);
            let (x_range, y_range) = match self.config.scale_type {
                ScaleType::Manual => {
                    let manual = (self.config.manual_min, self.config.manual_max);
                    (manual, manual)
                }
                ScaleType::Auto | ScaleType::Individual => {
                    (x_entry.contributed_range(), y_entry.contributed_range())
                }
            };
            let projection =
                PhaseProjection::new(self.viewport, layout.bottom_margin(), x_range, y_range)?;

            let samples = x_entry.source().len().min(y_entry.source().len());
            let x_values = signed_values(x_entry, samples);
            let y_values = signed_values(y_entry, samples);
            let (xs, ys): (Vec<f64>, Vec<f64>) = x_values
                .iter()
                .zip(&y_values)
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| (*x, *y))
                .unzip();
            let (xs, ys) = projection.scatter(&xs, &ys);

            let layer = PlotLayer::Data(pair as u8);
            frame.series.push(SeriesPrimitive::new(
                layer,
                ColorId::Series(pair as u8),
                xs,
                ys,
            ));

            let cursor = usize::try_from(current_index).ok().and_then(|index| {
                Some((*x_values.get(index)?, *y_values.get(index)?))
            });
            if let Some((x, y)) = cursor.filter(|(x, y)| x.is_finite() && y.is_finite()) {
                frame.lines.extend(projection.crosshair(layer, x, y));
            }
        }
        Ok(())
    }

    fn draw_labels(&self, frame: &mut RenderFrame, layout: &LabelLayout) {
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        frame
            .clears
            .push(ClearPrimitive::new(PlotLayer::Info, 0.0, 0.0, width, height));

        if self.config.show_baselines_info {
            frame.texts.extend(baseline_info_texts(
                &self.config.baselines,
                layout.row_text_y(0, height),
            ));
            return;
        }

        let current_index = self.window.current_index();
        let out_point = self.window.out_point();
        let phase = self.config.graph_type == GraphType::Phase;
        for (slot, entry) in self.entries.iter().enumerate() {
            let text = entry_label(
                &**entry.source(),
                self.config.show_namespaces,
                current_index,
                out_point,
            );
            let color_slot = if phase { slot / 2 } else { slot };
            let (x, y) = layout.label_origin(slot, height);
            frame.texts.push(TextPrimitive::new(
                PlotLayer::Info,
                text,
                x,
                y,
                ColorId::Series(color_slot as u8),
            ));
        }
    }
}
