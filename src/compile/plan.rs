use crate::compile::{backdrop, heatmap::HeatmapAccumulator, markers, path};
use crate::eval::view::FrameView;
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::playback::state::PlaybackState;
use crate::session::model::{GazeSession, SourceFile};
use crate::session::tokens::TokenMap;

/// Horizontal anchoring of a text label relative to its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Origin is the left edge of the text.
    Left,
    /// Origin is the horizontal center of the text.
    Center,
    /// Origin is the right edge of the text.
    Right,
}

/// A straight-alpha RGBA8 image produced at compile time (heatmap output).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA8 bytes, straight alpha, tightly packed, row-major.
    pub rgba: Vec<u8>,
}

#[derive(Clone, Debug)]
/// Draw operation emitted by the compiler.
///
/// Geometry is pre-transformed into surface coordinates: strokes and dashes
/// are expanded to fill paths at compile time, so backends only need fills,
/// blits, and glyph layout.
pub enum DrawOp {
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle in surface coordinates.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Fill a Bézier path (nonzero rule).
    FillPath {
        /// Path in surface coordinates.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
    /// Draw a compile-time raster image at the surface origin.
    Blit {
        /// The image; straight alpha, premultiplied by the backend.
        image: RasterImage,
    },
    /// Lay out and fill a single-line text label.
    Label {
        /// Label text.
        text: String,
        /// Baseline anchor point in surface coordinates.
        origin: Point,
        /// Font size in pixels.
        size_px: f32,
        /// Text color.
        color: Rgba8,
        /// Horizontal anchoring relative to `origin`.
        align: TextAlign,
    },
}

/// Identity of a layer pass in the fixed compositing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Simulated editor chrome and source text. Always present.
    Backdrop,
    /// Attention heatmap blit.
    Heatmap,
    /// Dashed polyline with arrowheads.
    GazePath,
    /// Marker disks and sequence labels.
    Markers,
    /// Pulsing ring around the active fixation.
    ActivePulse,
}

#[derive(Clone, Debug)]
/// One layer's draw operations.
pub struct LayerPass {
    /// Which layer this pass renders.
    pub kind: LayerKind,
    /// Operations in draw order.
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug)]
/// Backend-agnostic render plan for a single frame.
///
/// Passes appear in the fixed compositing order: backdrop, heatmap, gaze
/// path, markers, active pulse. Disabled or empty layers are simply absent;
/// the relative order of the remaining passes never changes.
pub struct RenderPlan {
    /// Target surface dimensions.
    pub canvas: Canvas,
    /// Layer passes in draw order.
    pub passes: Vec<LayerPass>,
}

impl RenderPlan {
    /// The pass for `kind`, if the frame includes that layer.
    pub fn pass(&self, kind: LayerKind) -> Option<&LayerPass> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}

/// Compile one frame from scratch.
///
/// Pure function of its inputs; the heatmap accumulates into a throwaway
/// grid. Interactive callers should prefer [`compile_frame_with_cache`] to
/// amortize heatmap cost across frames.
pub fn compile_frame(
    session: &GazeSession,
    source: &SourceFile,
    tokens: &TokenMap,
    state: &PlaybackState,
) -> RenderPlan {
    let mut cache = HeatmapAccumulator::new(session.canvas());
    compile_frame_with_cache(session, source, tokens, state, &mut cache)
}

/// Compile one frame, threading a heatmap accumulator between frames.
///
/// The accumulator must belong to this session (same surface, same record
/// sequence); [`HeatmapAccumulator`] rebuilds itself when the visible prefix
/// shrinks, so scrubbing in either direction stays correct. Output is
/// bit-identical to [`compile_frame`].
#[tracing::instrument(skip(session, source, tokens, state, cache), fields(t = state.current.0))]
pub fn compile_frame_with_cache(
    session: &GazeSession,
    source: &SourceFile,
    tokens: &TokenMap,
    state: &PlaybackState,
    cache: &mut HeatmapAccumulator,
) -> RenderPlan {
    let view = FrameView::at(session, state.current);
    let canvas = session.canvas();
    let mut passes = Vec::with_capacity(5);

    passes.push(LayerPass {
        kind: LayerKind::Backdrop,
        ops: backdrop::compile_backdrop(canvas, source, tokens),
    });

    if state.toggles.heatmap && !view.visible.is_empty() {
        cache.accumulate(view.visible);
        passes.push(LayerPass {
            kind: LayerKind::Heatmap,
            ops: vec![DrawOp::Blit {
                image: cache.colorize(),
            }],
        });
    }

    if state.toggles.gaze_path && view.visible.len() >= 2 {
        passes.push(LayerPass {
            kind: LayerKind::GazePath,
            ops: path::compile_gaze_path(view.visible),
        });
    }

    if state.toggles.fixations && !view.visible.is_empty() {
        passes.push(LayerPass {
            kind: LayerKind::Markers,
            ops: markers::compile_markers(view.visible),
        });
    }

    // The pulse draws whenever an active fixation exists; it is a playback
    // position indicator, not a togglable decoration.
    if let Some(active) = view.active {
        passes.push(LayerPass {
            kind: LayerKind::ActivePulse,
            ops: vec![markers::compile_pulse(active, state.current)],
        });
    }

    RenderPlan { canvas, passes }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
