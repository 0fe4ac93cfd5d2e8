use crate::foundation::error::{GazelineError, GazelineResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Vec2};

/// A playback timestamp in milliseconds from the start of the session.
///
/// Continuous time: ticks advance it by fractional real-time deltas, so the
/// inner value is a float even though record timestamps are integral.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimeMs(pub f64);

impl TimeMs {
    /// Time zero, the start of every session.
    pub const ZERO: TimeMs = TimeMs(0.0);

    /// Clamp into `[lo, hi]`.
    pub fn clamp(self, lo: TimeMs, hi: TimeMs) -> TimeMs {
        TimeMs(self.0.clamp(lo.0, hi.0))
    }
}

impl std::fmt::Display for TimeMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}ms", self.0)
    }
}

/// Raster surface dimensions in logical units (= pixels for the CPU backend).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Default surface width when a session document omits dimensions.
    pub const DEFAULT_WIDTH: u32 = 900;
    /// Default surface height when a session document omits dimensions.
    pub const DEFAULT_HEIGHT: u32 = 700;

    /// Build a canvas, rejecting zero-sized surfaces.
    pub fn new(width: u32, height: u32) -> GazelineResult<Self> {
        if width == 0 || height == 0 {
            return Err(GazelineError::validation("Canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Whether a point lies on the surface (inclusive bounds).
    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= f64::from(self.width) && p.y >= 0.0 && p.y <= f64::from(self.height)
    }

    /// The full surface as a rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Straight-alpha RGBA8 color as carried by the render IR.
///
/// Backends premultiply at the raster boundary; see [`Rgba8::premul`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight, not premultiplied).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied `[r, g, b, a]` bytes with round-to-nearest division.
    pub fn premul(self) -> [u8; 4] {
        fn mul(c: u8, a: u8) -> u8 {
            (((c as u16) * (a as u16) + 127) / 255) as u8
        }
        [
            mul(self.r, self.a),
            mul(self.g, self.a),
            mul(self.b, self.a),
            self.a,
        ]
    }
}
