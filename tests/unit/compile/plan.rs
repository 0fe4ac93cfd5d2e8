use super::*;

use crate::foundation::core::TimeMs;
use crate::playback::state::LayerToggles;
use crate::session::model::FixationRecord;
use crate::session::tokens::{LineCol, TokenDescriptor};

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

fn demo_source() -> SourceFile {
    SourceFile {
        file_id: "f1".to_string(),
        path: "src/demo.py".to_string(),
        language: "python".to_string(),
        code: "def demo():\n    pass\n".to_string(),
    }
}

fn demo_tokens() -> TokenMap {
    TokenMap::from_descriptors(vec![TokenDescriptor {
        id: "f1:1:1-1:4".to_string(),
        kind: "def".to_string(),
        text: "def".to_string(),
        start: LineCol { line: 1, column: 1 },
        end: LineCol { line: 1, column: 4 },
    }])
}

fn session2() -> GazeSession {
    GazeSession::new(
        Canvas::default(),
        vec![fix(1, 0, 500, 100.0, 100.0), fix(2, 600, 300, 200.0, 100.0)],
    )
    .unwrap()
}

fn state_at(t: f64) -> PlaybackState {
    PlaybackState {
        current: TimeMs(t),
        playing: false,
        speed: 1.0,
        toggles: LayerToggles::default(),
    }
}

fn kinds(plan: &RenderPlan) -> Vec<LayerKind> {
    plan.passes.iter().map(|p| p.kind).collect()
}

fn heatmap_blit(plan: &RenderPlan) -> RasterImage {
    let pass = plan.pass(LayerKind::Heatmap).expect("heatmap pass");
    match &pass.ops[0] {
        DrawOp::Blit { image } => image.clone(),
        other => panic!("expected a blit, got {other:?}"),
    }
}

#[test]
fn backdrop_always_leads() {
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state_at(0.0));
    assert_eq!(plan.canvas, Canvas::default());
    assert_eq!(plan.passes[0].kind, LayerKind::Backdrop);
    assert!(!plan.passes[0].ops.is_empty());
}

#[test]
fn empty_session_compiles_to_backdrop_only() {
    let session = GazeSession::empty(Canvas::default());
    let mut state = state_at(0.0);
    state.toggles.heatmap = true;
    let plan = compile_frame(&session, &demo_source(), &demo_tokens(), &state);
    assert_eq!(kinds(&plan), vec![LayerKind::Backdrop]);
}

#[test]
fn default_toggles_omit_the_heatmap() {
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state_at(700.0));
    assert!(plan.pass(LayerKind::Heatmap).is_none());
    assert!(plan.pass(LayerKind::GazePath).is_some());
    assert!(plan.pass(LayerKind::Markers).is_some());
    assert!(plan.pass(LayerKind::ActivePulse).is_some());
}

#[test]
fn path_pass_needs_two_visible_fixations() {
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state_at(100.0));
    assert!(plan.pass(LayerKind::GazePath).is_none());
    let markers = plan.pass(LayerKind::Markers).expect("markers pass");
    assert_eq!(markers.ops.len(), 3);
    assert!(plan.pass(LayerKind::ActivePulse).is_some());
}

#[test]
fn toggles_gate_their_layers_but_not_the_pulse() {
    let mut state = state_at(700.0);
    state.toggles.fixations = false;
    state.toggles.gaze_path = false;
    state.toggles.heatmap = true;
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state);
    assert_eq!(
        kinds(&plan),
        vec![LayerKind::Backdrop, LayerKind::Heatmap, LayerKind::ActivePulse]
    );
}

#[test]
fn pulse_is_absent_in_a_gap_between_fixations() {
    // 550ms falls after the first fixation ends and before the second begins.
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state_at(550.0));
    assert_eq!(kinds(&plan), vec![LayerKind::Backdrop, LayerKind::Markers]);
}

#[test]
fn passes_follow_the_fixed_layer_order() {
    let mut state = state_at(700.0);
    state.toggles.heatmap = true;
    let plan = compile_frame(&session2(), &demo_source(), &demo_tokens(), &state);
    assert_eq!(
        kinds(&plan),
        vec![
            LayerKind::Backdrop,
            LayerKind::Heatmap,
            LayerKind::GazePath,
            LayerKind::Markers,
            LayerKind::ActivePulse,
        ]
    );
}

#[test]
fn cached_heatmap_matches_a_cold_compile() {
    let session = session2();
    let source = demo_source();
    let tokens = demo_tokens();
    let mut state = state_at(100.0);
    state.toggles.heatmap = true;

    // Warm the cache on a one-fixation prefix, then advance.
    let mut cache = HeatmapAccumulator::new(session.canvas());
    compile_frame_with_cache(&session, &source, &tokens, &state, &mut cache);
    state.current = TimeMs(700.0);
    let warm = compile_frame_with_cache(&session, &source, &tokens, &state, &mut cache);
    let cold = compile_frame(&session, &source, &tokens, &state);
    assert_eq!(heatmap_blit(&warm), heatmap_blit(&cold));

    // Backward scrub shrinks the prefix; the cache rebuilds.
    state.current = TimeMs(100.0);
    let warm = compile_frame_with_cache(&session, &source, &tokens, &state, &mut cache);
    let cold = compile_frame(&session, &source, &tokens, &state);
    assert_eq!(heatmap_blit(&warm), heatmap_blit(&cold));
}
