use crate::foundation::core::TimeMs;

/// A togglable rendering layer.
///
/// The active-fixation pulse ring is deliberately not listed: it is a
/// playback-position indicator and always draws when an active fixation
/// exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Layer {
    /// Marker disks and sequence labels.
    Fixations,
    /// Dashed polyline with directional arrows.
    GazePath,
    /// Kernel-density attention heatmap.
    Heatmap,
}

/// Independent visibility flags for the togglable layers.
///
/// Flags only gate rendering; they never affect visible/active computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerToggles {
    /// Draw fixation markers.
    pub fixations: bool,
    /// Draw the gaze path.
    pub gaze_path: bool,
    /// Draw the heatmap.
    pub heatmap: bool,
}

impl Default for LayerToggles {
    /// Markers and path on, heatmap off.
    fn default() -> Self {
        Self {
            fixations: true,
            gaze_path: true,
            heatmap: false,
        }
    }
}

impl LayerToggles {
    /// Flip one layer's flag.
    pub fn toggle(&mut self, layer: Layer) {
        match layer {
            Layer::Fixations => self.fixations = !self.fixations,
            Layer::GazePath => self.gaze_path = !self.gaze_path,
            Layer::Heatmap => self.heatmap = !self.heatmap,
        }
    }

    /// Whether a layer is enabled.
    pub fn is_enabled(self, layer: Layer) -> bool {
        match layer {
            Layer::Fixations => self.fixations,
            Layer::GazePath => self.gaze_path,
            Layer::Heatmap => self.heatmap,
        }
    }
}

/// Snapshot of the playback state a frame is compiled against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Current playback time.
    pub current: TimeMs,
    /// Whether the clock is advancing.
    pub playing: bool,
    /// Speed multiplier in `[0.25, 3.0]`.
    pub speed: f64,
    /// Layer visibility flags.
    pub toggles: LayerToggles,
}
