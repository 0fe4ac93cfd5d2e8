//! Backend contract for turning render plans into pixels.

use crate::compile::plan::RenderPlan;
use crate::foundation::error::GazelineResult;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is
/// included to make this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// A renderer that can execute a compiled [`RenderPlan`] into a [`FrameRGBA`].
///
/// Backends are stateful so they can reuse raster contexts and font machinery
/// across frames; executing the same plan twice must produce identical bytes.
pub trait RenderBackend {
    /// Execute a backend-agnostic [`RenderPlan`] and read back the frame.
    fn render_plan(&mut self, plan: &RenderPlan) -> GazelineResult<FrameRGBA>;
}
