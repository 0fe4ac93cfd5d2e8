use crate::foundation::core::TimeMs;
use crate::session::model::{FixationRecord, GazeSession};

/// The fixations revealed at time `t`: the prefix of the chronologically
/// sorted sequence with `start_ms <= t`.
///
/// Monotone: for `t1 <= t2` the result at `t1` is a prefix (hence subset) of
/// the result at `t2`. Pure; safe to call at arbitrary frequency.
pub fn visible_fixations(session: &GazeSession, t: TimeMs) -> &[FixationRecord] {
    let records = session.records();
    let n = records.partition_point(|f| (f.start_ms as f64) <= t.0);
    &records[..n]
}

/// The fixation whose half-open interval `[start, start + duration)` contains
/// `t`, or `None`.
///
/// Overlapping intervals resolve to the earliest-starting one: the visible
/// prefix is scanned in chronological order and the first open interval wins.
pub fn active_fixation(session: &GazeSession, t: TimeMs) -> Option<&FixationRecord> {
    visible_fixations(session, t).iter().find(|f| f.contains(t))
}

/// Everything the compile stage needs about one instant of the replay.
///
/// Borrowed from the session; recomputed every tick, never persisted.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// The query time.
    pub time: TimeMs,
    /// Fixations with `start_ms <= time`, in chronological order.
    pub visible: &'a [FixationRecord],
    /// The fixation whose interval contains `time`, if any.
    pub active: Option<&'a FixationRecord>,
}

impl<'a> FrameView<'a> {
    /// Evaluate the view of `session` at time `t`.
    #[tracing::instrument(skip(session), level = "trace")]
    pub fn at(session: &'a GazeSession, t: TimeMs) -> Self {
        Self {
            time: t,
            visible: visible_fixations(session, t),
            active: active_fixation(session, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/view.rs"]
mod tests;
