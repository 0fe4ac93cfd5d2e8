//! Gazeline is a temporal gaze-replay and attention-heatmap rendering engine.
//!
//! Gazeline replays a recorded sequence of eye-gaze fixations over a piece of
//! source code and turns the replay state into pixels (`FrameRGBA`) via a
//! backend-agnostic render IR (`RenderPlan`).
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: session document (JSON) -> `LoadedSession` (validated once, immutable after)
//! 2. **Evaluate**: `GazeSession + TimeMs -> FrameView` (which fixations are visible, which is active)
//! 3. **Compile**: `FrameView + PlaybackState -> RenderPlan` (ordered layer passes of draw ops)
//! 4. **Render**: `RenderPlan -> FrameRGBA` (CPU backend)
//!
//! Interactive replay is driven by [`ReplayEngine`], which owns the playback
//! clock and translates discrete commands (play, pause, scrub, ...) and host
//! frame callbacks into recompute-and-draw passes.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: evaluation/compilation are pure and stable for a given input.
//! - **Validate once**: record invariants are checked at the ingestion boundary, never per frame.
//! - **Premultiplied RGBA8** out of the renderer: backends output premultiplied pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod compile;
mod eval;
mod foundation;
mod playback;
mod render;
mod replay;
mod session;

pub use compile::backdrop::{CHAR_ADVANCE, CODE_X, LINE_HEIGHT};
pub use compile::heatmap::{
    ALPHA_MAX, DURATION_NORM_MS, FALLOFF_RADIUS, HeatmapAccumulator, INTENSITY_SCALE,
    heatmap_image,
};
pub use compile::markers::marker_radius;
pub use compile::plan::{
    DrawOp, LayerKind, LayerPass, RasterImage, RenderPlan, TextAlign, compile_frame,
    compile_frame_with_cache,
};
pub use eval::view::{FrameView, active_fixation, visible_fixations};
pub use foundation::core::{Affine, BezPath, Canvas, Circle, Point, Rect, Rgba8, TimeMs, Vec2};
pub use foundation::error::{GazelineError, GazelineResult};
pub use playback::clock::{ClockState, PlaybackClock, SKIP_STEP_MS, SPEED_MAX, SPEED_MIN};
pub use playback::state::{Layer, LayerToggles, PlaybackState};
pub use render::backend::{FrameRGBA, RenderBackend};
pub use render::cpu::CpuRenderer;
pub use replay::engine::{Command, CommandOutcome, FrameTick, ReplayEngine, Scheduling};
pub use session::ingest::{
    FileSessionSource, LoadedSession, SessionRequest, SessionSource, parse_session_document,
};
pub use session::model::{FixationRecord, GazeSession, SourceFile};
pub use session::stats::{SessionStats, TokenDwell, token_dwell};
pub use session::tokens::{LineCol, TokenDescriptor, TokenMap, token_color};
