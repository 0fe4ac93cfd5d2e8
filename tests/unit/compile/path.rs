use super::*;

use kurbo::Shape;

fn fix_at(index: u32, x: f64, y: f64) -> FixationRecord {
    FixationRecord {
        index,
        token_id: format!("f1:{index}"),
        start_ms: u64::from(index) * 500,
        end_ms: u64::from(index) * 500 + 400,
        duration_ms: 400,
        centroid: Point::new(x, y),
        num_samples: 10,
        value: "tok".to_string(),
    }
}

fn fill_path(op: &DrawOp) -> (&BezPath, Rgba8) {
    match op {
        DrawOp::FillPath { path, color } => (path, *color),
        other => panic!("expected a fill path, got {other:?}"),
    }
}

#[test]
fn no_ops_below_two_fixations() {
    assert!(compile_gaze_path(&[]).is_empty());
    assert!(compile_gaze_path(&[fix_at(1, 100.0, 100.0)]).is_empty());
}

#[test]
fn one_stroke_then_one_arrow_per_segment() {
    let records = [
        fix_at(1, 100.0, 100.0),
        fix_at(2, 300.0, 200.0),
        fix_at(3, 500.0, 100.0),
    ];
    let ops = compile_gaze_path(&records);
    assert_eq!(ops.len(), 3);
    for op in &ops {
        let (_, color) = fill_path(op);
        assert_eq!(color, PATH_COLOR);
    }
}

#[test]
fn polyline_stays_within_the_stroked_span() {
    let records = [fix_at(1, 100.0, 100.0), fix_at(2, 300.0, 200.0)];
    let ops = compile_gaze_path(&records);
    let (path, _) = fill_path(&ops[0]);
    let bbox = path.bounding_box();
    assert!(bbox.x0 >= 90.0 && bbox.x1 <= 310.0);
    assert!(bbox.y0 >= 90.0 && bbox.y1 <= 210.0);
    // Dashes start at the first centroid, so coverage begins there.
    assert!(bbox.x0 <= 101.0);
    assert!(bbox.x1 >= 250.0);
}

#[test]
fn arrowhead_tip_pulls_back_from_the_endpoint() {
    let records = [fix_at(1, 100.0, 100.0), fix_at(2, 200.0, 100.0)];
    let ops = compile_gaze_path(&records);
    // Horizontal segment: tip at (185, 100), base 8 behind, half-width 4.
    let (arrow, _) = fill_path(&ops[1]);
    let bbox = arrow.bounding_box();
    assert!((bbox.x1 - 185.0).abs() < 1e-6);
    assert!((bbox.x0 - 177.0).abs() < 1e-6);
    assert!((bbox.y0 - 96.0).abs() < 1e-6);
    assert!((bbox.y1 - 104.0).abs() < 1e-6);
}

#[test]
fn zero_length_segment_points_along_positive_x() {
    let records = [fix_at(1, 150.0, 150.0), fix_at(2, 150.0, 150.0)];
    let ops = compile_gaze_path(&records);
    let (arrow, _) = fill_path(&ops[1]);
    let bbox = arrow.bounding_box();
    assert!((bbox.x1 - 135.0).abs() < 1e-6);
    assert!((bbox.y0 - 146.0).abs() < 1e-6);
    assert!((bbox.y1 - 154.0).abs() < 1e-6);
}
