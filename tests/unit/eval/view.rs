use super::*;
use crate::foundation::core::Canvas;
use kurbo::Point;

fn fix(index: u32, start_ms: u64, duration_ms: u64) -> FixationRecord {
    FixationRecord {
        index,
        token_id: format!("t{index}"),
        start_ms,
        end_ms: start_ms + duration_ms,
        duration_ms,
        centroid: Point::new(100.0 * index as f64, 100.0),
        num_samples: 4,
        value: "x".to_string(),
    }
}

fn two_fixation_session() -> GazeSession {
    GazeSession::new(Canvas::default(), vec![fix(1, 0, 500), fix(2, 600, 300)]).unwrap()
}

#[test]
fn visible_is_a_monotone_prefix() {
    let session = two_fixation_session();
    assert_eq!(visible_fixations(&session, TimeMs(0.0)).len(), 1);
    assert_eq!(visible_fixations(&session, TimeMs(500.0)).len(), 1);
    assert_eq!(visible_fixations(&session, TimeMs(599.9)).len(), 1);
    assert_eq!(visible_fixations(&session, TimeMs(600.0)).len(), 2);
    assert_eq!(visible_fixations(&session, TimeMs(900.0)).len(), 2);

    // Earlier views are leading prefixes of later ones, record for record.
    let late = visible_fixations(&session, TimeMs(900.0));
    for t in [0.0, 500.0, 599.9, 600.0] {
        let early = visible_fixations(&session, TimeMs(t));
        assert_eq!(early, &late[..early.len()]);
    }
}

#[test]
fn active_respects_half_open_intervals() {
    let session = two_fixation_session();
    assert_eq!(active_fixation(&session, TimeMs(0.0)).map(|f| f.index), Some(1));
    assert_eq!(active_fixation(&session, TimeMs(499.9)).map(|f| f.index), Some(1));
    // Gap between the records: first interval closed, second not yet open.
    assert!(active_fixation(&session, TimeMs(500.0)).is_none());
    assert!(active_fixation(&session, TimeMs(599.9)).is_none());
    assert_eq!(active_fixation(&session, TimeMs(600.0)).map(|f| f.index), Some(2));
    assert!(active_fixation(&session, TimeMs(900.0)).is_none());
}

#[test]
fn overlap_resolves_to_the_earliest_start() {
    let session = GazeSession::new(
        Canvas::default(),
        vec![fix(1, 0, 1000), fix(2, 100, 100)],
    )
    .unwrap();
    assert_eq!(active_fixation(&session, TimeMs(150.0)).map(|f| f.index), Some(1));
}

#[test]
fn frame_view_bundles_time_visible_active() {
    let session = two_fixation_session();
    let view = FrameView::at(&session, TimeMs(700.0));
    assert_eq!(view.time, TimeMs(700.0));
    assert_eq!(view.visible.len(), 2);
    assert_eq!(view.active.map(|f| f.index), Some(2));

    let quiet = FrameView::at(&session, TimeMs(550.0));
    assert_eq!(quiet.visible.len(), 1);
    assert!(quiet.active.is_none());
}

#[test]
fn empty_session_has_empty_views() {
    let session = GazeSession::empty(Canvas::default());
    let view = FrameView::at(&session, TimeMs(0.0));
    assert!(view.visible.is_empty());
    assert!(view.active.is_none());
}
