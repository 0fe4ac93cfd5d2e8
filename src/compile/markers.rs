//! Fixation-marker layer: per-fixation disks with sequence labels, and the
//! pulsing ring around the active fixation.

use kurbo::{Cap, Join, Shape, Stroke, StrokeOpts};

use crate::compile::plan::{DrawOp, TextAlign};
use crate::foundation::core::{Circle, Point, Rgba8, TimeMs};
use crate::session::model::FixationRecord;

/// Marker red.
const MARKER_COLOR: Rgba8 = Rgba8::rgb(0xdc, 0x35, 0x45);
/// Alpha of the translucent outer disk (30% of opaque).
const OUTER_ALPHA: u8 = 76;
/// Sequence-label color.
const LABEL_COLOR: Rgba8 = Rgba8::rgb(0xff, 0xff, 0xff);
/// Sequence-label font size in pixels.
const LABEL_SIZE: f32 = 12.0;
/// Pulse-ring color.
const PULSE_COLOR: Rgba8 = Rgba8::rgb(0xff, 0xc1, 0x07);
/// Pulse-ring stroke width.
const PULSE_WIDTH: f64 = 3.0;
/// Amplitude of the ring's radius oscillation in surface units.
const PULSE_AMPLITUDE: f64 = 5.0;
/// Milliseconds of elapsed time per radian of pulse phase.
const PULSE_PHASE_MS: f64 = 100.0;
/// Tolerance for circle flattening and stroke expansion.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Marker radius for a fixation of `duration_ms`: one surface unit per
/// 20ms of dwell, clamped to `[8, 30]`.
pub fn marker_radius(duration_ms: u64) -> f64 {
    (duration_ms as f64 / 20.0).clamp(8.0, 30.0)
}

/// Compiles marker disks and 1-based sequence labels for `visible`, in
/// chronological order. Labels number the visible prefix, not the absolute
/// session index.
pub(crate) fn compile_markers(visible: &[FixationRecord]) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(visible.len() * 3);
    for (ordinal, record) in visible.iter().enumerate() {
        let radius = marker_radius(record.duration_ms);
        let center = record.centroid;
        ops.push(DrawOp::FillPath {
            path: Circle::new(center, radius).to_path(FLATTEN_TOLERANCE),
            color: Rgba8::rgba(MARKER_COLOR.r, MARKER_COLOR.g, MARKER_COLOR.b, OUTER_ALPHA),
        });
        ops.push(DrawOp::FillPath {
            path: Circle::new(center, radius / 3.0).to_path(FLATTEN_TOLERANCE),
            color: MARKER_COLOR,
        });
        ops.push(DrawOp::Label {
            text: (ordinal + 1).to_string(),
            origin: Point::new(center.x, center.y + 4.0),
            size_px: LABEL_SIZE,
            color: LABEL_COLOR,
            align: TextAlign::Center,
        });
    }
    ops
}

/// Compiles the pulsing ring around the active fixation at time `now`.
///
/// Ring radius oscillates around the marker radius as a pure function of
/// elapsed time since the fixation began, so re-rendering the same instant
/// reproduces the same geometry.
pub(crate) fn compile_pulse(active: &FixationRecord, now: TimeMs) -> DrawOp {
    let elapsed = now.0 - active.start_ms as f64;
    let radius =
        marker_radius(active.duration_ms) + PULSE_AMPLITUDE * (elapsed / PULSE_PHASE_MS).sin();
    let ring = Circle::new(active.centroid, radius).to_path(FLATTEN_TOLERANCE);
    let style = Stroke::new(PULSE_WIDTH).with_caps(Cap::Butt).with_join(Join::Miter);
    DrawOp::FillPath {
        path: kurbo::stroke(ring, &style, &StrokeOpts::default(), FLATTEN_TOLERANCE),
        color: PULSE_COLOR,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/markers.rs"]
mod tests;
