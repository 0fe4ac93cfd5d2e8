//! Gaze-path layer: dashed polyline through the visible centroids plus a
//! directional arrowhead per segment.

use kurbo::{Cap, Join, Stroke, StrokeOpts};

use crate::compile::plan::DrawOp;
use crate::foundation::core::{Affine, BezPath, Point, Rgba8, Vec2};
use crate::session::model::FixationRecord;

/// Scan-path color.
const PATH_COLOR: Rgba8 = Rgba8::rgb(0x00, 0x7b, 0xff);
/// Polyline stroke width in surface units.
const PATH_WIDTH: f64 = 2.0;
/// On/off lengths of the dash pattern.
const DASH_PATTERN: [f64; 2] = [5.0, 5.0];
/// Distance from a segment endpoint to the arrowhead tip, so the tip clears
/// the destination marker disk.
const ARROW_PULLBACK: f64 = 15.0;
/// Tolerance for stroke expansion.
const STROKE_TOLERANCE: f64 = 0.1;

/// Compiles the dashed scan path connecting `visible` in chronological
/// order. Returns no ops for fewer than two fixations.
pub(crate) fn compile_gaze_path(visible: &[FixationRecord]) -> Vec<DrawOp> {
    if visible.len() < 2 {
        return Vec::new();
    }

    let mut polyline = BezPath::new();
    polyline.move_to(visible[0].centroid);
    for record in &visible[1..] {
        polyline.line_to(record.centroid);
    }

    let style = Stroke::new(PATH_WIDTH)
        .with_caps(Cap::Butt)
        .with_join(Join::Miter)
        .with_dashes(0.0, DASH_PATTERN);
    let mut ops = vec![DrawOp::FillPath {
        path: kurbo::stroke(polyline, &style, &StrokeOpts::default(), STROKE_TOLERANCE),
        color: PATH_COLOR,
    }];

    ops.extend(visible.windows(2).map(|pair| DrawOp::FillPath {
        path: arrowhead(pair[0].centroid, pair[1].centroid),
        color: PATH_COLOR,
    }));
    ops
}

/// Filled triangle oriented along the segment, tip pulled back from `to`.
///
/// A zero-length segment yields an angle of zero (arrow pointing +x), same
/// as `atan2(0, 0)`.
fn arrowhead(from: Point, to: Point) -> BezPath {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let tip = to - ARROW_PULLBACK * Vec2::new(angle.cos(), angle.sin());

    let mut tri = BezPath::new();
    tri.move_to((0.0, 0.0));
    tri.line_to((-8.0, -4.0));
    tri.line_to((-8.0, 4.0));
    tri.close_path();
    tri.apply_affine(Affine::translate(tip.to_vec2()) * Affine::rotate(angle));
    tri
}

#[cfg(test)]
#[path = "../../tests/unit/compile/path.rs"]
mod tests;
