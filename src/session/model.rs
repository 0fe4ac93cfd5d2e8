use kurbo::Point;

use crate::foundation::core::{Canvas, TimeMs};
use crate::foundation::error::{GazelineError, GazelineResult};

/// One recorded fixation: an interval during which gaze rested near a stable
/// point on the surface.
///
/// Records are produced by the external extraction service and are immutable
/// once ingested. `token_id` is a back-reference into the session's token map,
/// never an ownership link; fixations referencing unknown tokens are legal.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FixationRecord {
    /// Sequence position as recorded by the extraction service (1-based).
    pub index: u32,
    /// Back-reference to the source-code token the gaze rested on.
    pub token_id: String,
    /// Interval start, milliseconds from session start.
    pub start_ms: u64,
    /// Interval end, milliseconds from session start.
    pub end_ms: u64,
    /// Interval length; always `end_ms - start_ms`.
    pub duration_ms: u64,
    /// Representative position of the fixation's gaze samples on the surface.
    pub centroid: Point,
    /// Number of raw gaze samples merged into this fixation.
    pub num_samples: u32,
    /// Literal text of the associated token.
    pub value: String,
}

impl FixationRecord {
    /// Whether the half-open interval `[start_ms, start_ms + duration_ms)`
    /// contains `t`.
    pub fn contains(&self, t: TimeMs) -> bool {
        let start = self.start_ms as f64;
        start <= t.0 && t.0 < start + self.duration_ms as f64
    }

    /// End of this record's influence on the timeline: `start_ms + duration_ms`.
    pub fn extent_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    fn validate(&self, canvas: Canvas) -> GazelineResult<()> {
        if self.end_ms < self.start_ms {
            return Err(GazelineError::validation(format!(
                "fixation {}: end_ms {} precedes start_ms {}",
                self.index, self.end_ms, self.start_ms
            )));
        }
        if self.end_ms - self.start_ms != self.duration_ms {
            return Err(GazelineError::validation(format!(
                "fixation {}: duration_ms {} does not match interval [{}, {}]",
                self.index, self.duration_ms, self.start_ms, self.end_ms
            )));
        }
        if !self.centroid.x.is_finite() || !self.centroid.y.is_finite() {
            return Err(GazelineError::validation(format!(
                "fixation {}: centroid is not finite",
                self.index
            )));
        }
        if !canvas.contains(self.centroid) {
            return Err(GazelineError::validation(format!(
                "fixation {}: centroid ({}, {}) outside {}x{} surface",
                self.index, self.centroid.x, self.centroid.y, canvas.width, canvas.height
            )));
        }
        Ok(())
    }
}

/// An ordered, validated fixation sequence plus the surface it was recorded on.
///
/// Built once at load time via [`GazeSession::new`]; never mutated afterwards.
/// The record slice is guaranteed sorted ascending by `start_ms`, which the
/// evaluation stage relies on for prefix queries.
#[derive(Clone, Debug, PartialEq)]
pub struct GazeSession {
    canvas: Canvas,
    records: Vec<FixationRecord>,
}

impl GazeSession {
    /// Validate and seal a fixation sequence.
    ///
    /// Checks per-record invariants (interval consistency, in-bounds centroid)
    /// and that the sequence is sorted ascending by `start_ms`. An empty
    /// sequence is valid and yields a quiescent session.
    pub fn new(canvas: Canvas, records: Vec<FixationRecord>) -> GazelineResult<Self> {
        for record in &records {
            record.validate(canvas)?;
        }
        for pair in records.windows(2) {
            if pair[1].start_ms < pair[0].start_ms {
                return Err(GazelineError::validation(format!(
                    "fixation sequence not sorted by start_ms at index {} ({} after {})",
                    pair[1].index, pair[1].start_ms, pair[0].start_ms
                )));
            }
        }
        Ok(Self { canvas, records })
    }

    /// An empty session on the given surface.
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            records: Vec::new(),
        }
    }

    /// The surface the session was recorded on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The fixation sequence, sorted ascending by `start_ms`.
    pub fn records(&self) -> &[FixationRecord] {
        &self.records
    }

    /// Whether the session holds no fixations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derived replay length: `max(start_ms + duration_ms)` over all records,
    /// or 0 for an empty session.
    pub fn total_duration(&self) -> TimeMs {
        let max = self
            .records
            .iter()
            .map(FixationRecord::extent_ms)
            .max()
            .unwrap_or(0);
        TimeMs(max as f64)
    }
}

/// Metadata and full text of the source file the session was recorded over.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SourceFile {
    /// Stable identifier assigned by the extraction service.
    pub file_id: String,
    /// Path of the file as captured.
    pub path: String,
    /// Language identifier (tree-sitter grammar name, e.g. `python`).
    pub language: String,
    /// Full source text.
    pub code: String,
}

impl SourceFile {
    /// Final path component, used as the editor tab label.
    pub fn basename(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/model.rs"]
mod tests;
