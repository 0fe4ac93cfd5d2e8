use super::*;

fn fix_at(index: u32, start: u64, dur: u64, x: f64, y: f64) -> FixationRecord {
    FixationRecord {
        index,
        token_id: format!("f1:{index}"),
        start_ms: start,
        end_ms: start + dur,
        duration_ms: dur,
        centroid: Point::new(x, y),
        num_samples: 10,
        value: "tok".to_string(),
    }
}

fn fill_path(op: &DrawOp) -> (&kurbo::BezPath, Rgba8) {
    match op {
        DrawOp::FillPath { path, color } => (path, *color),
        other => panic!("expected a fill path, got {other:?}"),
    }
}

#[test]
fn radius_scales_dwell_and_clamps() {
    assert_eq!(marker_radius(0), 8.0);
    assert_eq!(marker_radius(100), 8.0);
    assert_eq!(marker_radius(400), 20.0);
    assert_eq!(marker_radius(1000), 30.0);
}

#[test]
fn three_ops_per_fixation_with_ordinal_labels() {
    // Labels follow the visible-prefix ordinal, not the recorded index.
    let records = [fix_at(7, 0, 400, 100.0, 100.0), fix_at(9, 500, 400, 200.0, 150.0)];
    let ops = compile_markers(&records);
    assert_eq!(ops.len(), 6);
    for (ordinal, label) in [(0usize, "1"), (1, "2")] {
        match &ops[ordinal * 3 + 2] {
            DrawOp::Label {
                text,
                origin,
                size_px,
                color,
                align,
            } => {
                assert_eq!(text, label);
                assert_eq!(*origin, Point::new(records[ordinal].centroid.x, records[ordinal].centroid.y + 4.0));
                assert_eq!(*size_px, LABEL_SIZE);
                assert_eq!(*color, LABEL_COLOR);
                assert_eq!(*align, TextAlign::Center);
            }
            other => panic!("expected a label, got {other:?}"),
        }
    }
}

#[test]
fn disks_span_the_marker_radius() {
    let ops = compile_markers(&[fix_at(1, 0, 400, 300.0, 300.0)]);
    let (outer, outer_color) = fill_path(&ops[0]);
    let (inner, inner_color) = fill_path(&ops[1]);
    assert_eq!(
        outer_color,
        Rgba8::rgba(MARKER_COLOR.r, MARKER_COLOR.g, MARKER_COLOR.b, OUTER_ALPHA)
    );
    assert_eq!(inner_color, MARKER_COLOR);

    // 400ms dwell: outer radius 20, inner a third of that.
    let bbox = outer.bounding_box();
    assert!((bbox.x0 - 280.0).abs() < 0.5 && (bbox.x1 - 320.0).abs() < 0.5);
    assert!((bbox.y0 - 280.0).abs() < 0.5 && (bbox.y1 - 320.0).abs() < 0.5);
    let bbox = inner.bounding_box();
    assert!((bbox.x0 - (300.0 - 20.0 / 3.0)).abs() < 0.5);
    assert!((bbox.x1 - (300.0 + 20.0 / 3.0)).abs() < 0.5);
}

#[test]
fn pulse_ring_oscillates_with_elapsed_time() {
    let active = fix_at(1, 1000, 2000, 400.0, 300.0);

    let half_width = |now: TimeMs| {
        let op = compile_pulse(&active, now);
        let (ring, color) = fill_path(&op);
        assert_eq!(color, PULSE_COLOR);
        let bbox = ring.bounding_box();
        (bbox.x1 - bbox.x0) / 2.0
    };

    // Phase zero: base radius 30 plus half the stroke width.
    let at_start = half_width(TimeMs(1000.0));
    assert!((at_start - 31.5).abs() < 0.5);
    // Quarter period later the sine peaks, adding the full amplitude.
    let at_peak = half_width(TimeMs(1000.0 + 100.0 * std::f64::consts::FRAC_PI_2));
    assert!((at_peak - 36.5).abs() < 0.5);
    assert!((at_peak - at_start - PULSE_AMPLITUDE).abs() < 0.5);
}
