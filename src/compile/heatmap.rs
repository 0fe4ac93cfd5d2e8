use rayon::prelude::*;

use crate::compile::plan::RasterImage;
use crate::foundation::core::Canvas;
use crate::session::model::FixationRecord;

/// Kernel falloff radius in surface units; contributions are zero beyond it.
pub const FALLOFF_RADIUS: f32 = 100.0;
/// Duration normalizer in milliseconds: a 1000ms fixation has unit weight.
pub const DURATION_NORM_MS: f32 = 1000.0;
/// Scale from accumulated intensity to the 0..=255 color domain.
pub const INTENSITY_SCALE: f32 = 100.0;
/// Upper bound of the heatmap alpha channel.
pub const ALPHA_MAX: f32 = 150.0;

/// Per-pixel kernel-density accumulator over the visible fixation set.
///
/// `intensity(x,y) = Σ max(0, 1 − dist/R) · (duration_ms / D)` over visible
/// fixations. Because the visible set is a monotone prefix of the session,
/// the accumulator caches the intensity grid together with the count of
/// fixations already applied: advancing time only adds the new suffix, and a
/// shrunken prefix (backward scrub) rebuilds from zero. Both paths add
/// contributions in fixation order, so cached and cold results are
/// bit-identical.
///
/// The cache assumes one immutable session: feeding prefixes of a different
/// record sequence is undefined (garbage output, not a crash).
#[derive(Clone, Debug)]
pub struct HeatmapAccumulator {
    canvas: Canvas,
    grid: Vec<f32>,
    applied: usize,
}

impl HeatmapAccumulator {
    /// An empty accumulator for the given surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            grid: vec![0.0; canvas.width as usize * canvas.height as usize],
            applied: 0,
        }
    }

    /// The surface this accumulator rasterizes to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of fixations currently folded into the grid.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Bring the grid up to date with `visible`, the current prefix of the
    /// session's record sequence.
    pub fn accumulate(&mut self, visible: &[FixationRecord]) {
        if visible.len() < self.applied {
            self.grid.fill(0.0);
            self.applied = 0;
        }
        for record in &visible[self.applied..] {
            self.add_contribution(record);
        }
        self.applied = visible.len();
    }

    /// Accumulated intensity at a pixel, for inspection and tests.
    pub fn intensity_at(&self, x: u32, y: u32) -> f32 {
        self.grid[y as usize * self.canvas.width as usize + x as usize]
    }

    /// Colorize the grid into a straight-alpha RGBA8 image.
    ///
    /// `normalized = min(intensity·S, 255)`; red `min(255, 2n)`, green
    /// `min(255, 1.5n)`, blue `max(0, 255 − 2n)`, alpha `min(150, n)`.
    /// Pixels with zero normalized intensity stay fully transparent.
    pub fn colorize(&self) -> RasterImage {
        let width = self.canvas.width as usize;
        let mut rgba = vec![0u8; width * self.canvas.height as usize * 4];
        rgba.par_chunks_exact_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let grid_row = &self.grid[y * width..(y + 1) * width];
                for (x, &intensity) in grid_row.iter().enumerate() {
                    let normalized = (intensity * INTENSITY_SCALE).min(255.0);
                    if normalized > 0.0 {
                        let px = &mut row[x * 4..x * 4 + 4];
                        px[0] = (normalized * 2.0).min(255.0) as u8;
                        px[1] = (normalized * 1.5).min(255.0) as u8;
                        px[2] = (255.0 - normalized * 2.0).max(0.0) as u8;
                        px[3] = normalized.min(ALPHA_MAX) as u8;
                    }
                }
            });
        RasterImage {
            width: self.canvas.width,
            height: self.canvas.height,
            rgba,
        }
    }

    fn add_contribution(&mut self, record: &FixationRecord) {
        let width = self.canvas.width as usize;
        let cx = record.centroid.x as f32;
        let cy = record.centroid.y as f32;
        let weight = record.duration_ms as f32 / DURATION_NORM_MS;

        // The kernel is zero beyond FALLOFF_RADIUS, so only the clamped
        // bounding square of the disk needs visiting.
        let x0 = ((cx - FALLOFF_RADIUS).floor().max(0.0)) as usize;
        let y0 = ((cy - FALLOFF_RADIUS).floor().max(0.0)) as usize;
        let x1 = ((cx + FALLOFF_RADIUS).ceil() as usize + 1).min(width);
        let y1 = ((cy + FALLOFF_RADIUS).ceil() as usize + 1).min(self.canvas.height as usize);

        for y in y0..y1 {
            let row = &mut self.grid[y * width..(y + 1) * width];
            let dy = y as f32 - cy;
            for (x, cell) in row[x0..x1].iter_mut().enumerate() {
                let dx = (x0 + x) as f32 - cx;
                let dist = (dx * dx + dy * dy).sqrt();
                let falloff = (1.0 - dist / FALLOFF_RADIUS).max(0.0);
                *cell += falloff * weight;
            }
        }
    }
}

/// Colorized heatmap of `visible` on a fresh accumulator.
pub fn heatmap_image(canvas: Canvas, visible: &[FixationRecord]) -> RasterImage {
    let mut acc = HeatmapAccumulator::new(canvas);
    acc.accumulate(visible);
    acc.colorize()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/heatmap.rs"]
mod tests;
