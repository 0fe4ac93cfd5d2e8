use super::*;

use std::time::Duration;

use kurbo::Point;

use crate::foundation::core::Canvas;
use crate::render::cpu::CpuRenderer;
use crate::session::model::FixationRecord;

fn fix(index: u32, start: u64, dur: u64, x: f64, y: f64) -> FixationRecord {
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

fn engine() -> ReplayEngine {
    let session = GazeSession::new(
        Canvas::default(),
        vec![fix(1, 0, 500, 100.0, 100.0), fix(2, 600, 300, 200.0, 100.0)],
    )
    .unwrap();
    ReplayEngine::new(LoadedSession {
        source: SourceFile {
            file_id: "f1".to_string(),
            path: "src/demo.py".to_string(),
            language: "python".to_string(),
            code: "def demo():\n    pass\n".to_string(),
        },
        tokens: TokenMap::default(),
        session,
    })
}

fn outcome(redraw: bool, scheduling: Scheduling) -> CommandOutcome {
    CommandOutcome { redraw, scheduling }
}

#[test]
fn play_starts_scheduling_without_redraw() {
    let mut e = engine();
    assert_eq!(e.command(Command::Play), outcome(false, Scheduling::Start));
    assert!(e.playback().playing);
    // A second play is a no-op and must not restart the callback chain.
    assert_eq!(e.command(Command::Play), outcome(false, Scheduling::Unchanged));
}

#[test]
fn pause_cancels_only_when_playing() {
    let mut e = engine();
    assert_eq!(e.command(Command::Pause), outcome(false, Scheduling::Unchanged));
    e.command(Command::Play);
    assert_eq!(e.command(Command::Pause), outcome(false, Scheduling::Cancel));
    assert!(!e.playback().playing);
}

#[test]
fn reset_redraws_and_cancels_if_playing() {
    let mut e = engine();
    e.command(Command::Play);
    e.command(Command::Scrub(TimeMs(700.0)));
    assert_eq!(e.command(Command::Reset), outcome(true, Scheduling::Cancel));
    assert_eq!(e.playback().current, TimeMs::ZERO);
    assert!(!e.playback().playing);
    assert_eq!(e.command(Command::Reset), outcome(true, Scheduling::Unchanged));
}

#[test]
fn time_and_toggle_commands_redraw_in_place() {
    let mut e = engine();
    assert_eq!(
        e.command(Command::Scrub(TimeMs(700.0))),
        outcome(true, Scheduling::Unchanged)
    );
    assert_eq!(e.playback().current, TimeMs(700.0));

    assert_eq!(e.command(Command::SkipBack), outcome(true, Scheduling::Unchanged));
    assert_eq!(e.playback().current, TimeMs::ZERO);
    assert_eq!(e.command(Command::SkipForward), outcome(true, Scheduling::Unchanged));
    assert_eq!(e.playback().current, TimeMs(900.0));

    assert_eq!(e.command(Command::SetSpeed(2.0)), outcome(true, Scheduling::Unchanged));
    assert_eq!(e.playback().speed, 2.0);

    assert_eq!(
        e.command(Command::Toggle(Layer::Heatmap)),
        outcome(true, Scheduling::Unchanged)
    );
    assert!(e.playback().toggles.heatmap);
}

#[test]
fn frame_callbacks_measure_wall_deltas() {
    let mut e = engine();
    e.command(Command::Play);
    let t0 = Instant::now();
    // The first callback after play has no predecessor to measure against.
    assert_eq!(
        e.on_frame(t0),
        FrameTick {
            ticked: true,
            request_next: true
        }
    );
    assert_eq!(e.playback().current, TimeMs::ZERO);

    e.on_frame(t0 + Duration::from_millis(100));
    assert!((e.playback().current.0 - 100.0).abs() < 1e-6);
    e.on_frame(t0 + Duration::from_millis(250));
    assert!((e.playback().current.0 - 250.0).abs() < 1e-6);
}

#[test]
fn stale_callbacks_while_paused_are_inert() {
    let mut e = engine();
    e.command(Command::Scrub(TimeMs(300.0)));
    assert_eq!(
        e.on_frame(Instant::now()),
        FrameTick {
            ticked: false,
            request_next: false
        }
    );
    assert_eq!(e.playback().current, TimeMs(300.0));
}

#[test]
fn resume_skips_the_paused_wall_time() {
    let mut e = engine();
    e.command(Command::Play);
    let t0 = Instant::now();
    e.on_frame(t0);
    e.on_frame(t0 + Duration::from_millis(100));
    e.command(Command::Pause);
    e.command(Command::Play);

    // Ten wall-clock seconds pass while paused; replay time must not jump.
    let resumed = t0 + Duration::from_secs(10);
    e.on_frame(resumed);
    assert!((e.playback().current.0 - 100.0).abs() < 1e-6);
    e.on_frame(resumed + Duration::from_millis(50));
    assert!((e.playback().current.0 - 150.0).abs() < 1e-6);
}

#[test]
fn speed_scales_measured_deltas() {
    let mut e = engine();
    e.command(Command::SetSpeed(2.0));
    e.command(Command::Play);
    let t0 = Instant::now();
    e.on_frame(t0);
    e.on_frame(t0 + Duration::from_millis(100));
    assert!((e.playback().current.0 - 200.0).abs() < 1e-6);
}

#[test]
fn wraps_at_total_and_keeps_requesting() {
    let mut e = engine();
    e.command(Command::Play);
    e.command(Command::Scrub(TimeMs(900.0)));
    let tick = e.on_frame(Instant::now());
    assert!(tick.ticked && tick.request_next);
    assert_eq!(e.playback().current, TimeMs::ZERO);
    assert!(e.playback().playing);
}

#[test]
fn accessors_reflect_the_loaded_session() {
    let e = engine();
    assert_eq!(e.session().records().len(), 2);
    assert_eq!(e.stats().total_fixations, 2);
    assert_eq!(e.view().time, TimeMs::ZERO);
    assert_eq!(e.view().visible.len(), 1);
}

#[test]
fn render_frame_is_deterministic_across_cache_reuse() {
    let mut e = engine();
    let mut renderer = CpuRenderer::new();

    let frame = e.render_frame(&mut renderer).unwrap();
    assert_eq!((frame.width, frame.height), (900, 700));
    assert!(frame.premultiplied);
    assert!(frame.data.iter().any(|&b| b != 0));

    // Heatmap on, scrub forward then back: the cached accumulator must
    // reproduce the cold result byte for byte.
    e.command(Command::Toggle(Layer::Heatmap));
    e.command(Command::Scrub(TimeMs(700.0)));
    let first = e.render_frame(&mut renderer).unwrap();
    e.command(Command::Scrub(TimeMs(100.0)));
    e.render_frame(&mut renderer).unwrap();
    e.command(Command::Scrub(TimeMs(700.0)));
    let second = e.render_frame(&mut renderer).unwrap();
    assert_eq!(first.data, second.data);
}
