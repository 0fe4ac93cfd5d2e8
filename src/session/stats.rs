use std::collections::BTreeMap;

use crate::session::model::GazeSession;

/// Aggregate reading statistics over a whole session.
///
/// All fields are zero for an empty session; the average is guarded against
/// division by zero rather than erroring.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct SessionStats {
    /// Number of fixations in the session.
    pub total_fixations: usize,
    /// Mean fixation duration in milliseconds, 0.0 when empty.
    pub average_duration_ms: f64,
    /// Longest single fixation in milliseconds, 0 when empty.
    pub longest_fixation_ms: u64,
}

impl SessionStats {
    /// Compute statistics for a session.
    pub fn of(session: &GazeSession) -> Self {
        let records = session.records();
        if records.is_empty() {
            return Self::default();
        }
        let total: u64 = records.iter().map(|f| f.duration_ms).sum();
        let longest = records.iter().map(|f| f.duration_ms).max().unwrap_or(0);
        Self {
            total_fixations: records.len(),
            average_duration_ms: total as f64 / records.len() as f64,
            longest_fixation_ms: longest,
        }
    }
}

/// Accumulated attention attributed to one token across a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TokenDwell {
    /// Number of fixations that rested on the token.
    pub fixation_count: usize,
    /// Total fixation time on the token in milliseconds.
    pub total_dwell_ms: u64,
}

/// Per-token dwell aggregation, keyed by `token_id` in deterministic order.
///
/// Fixations referencing tokens absent from the token map still aggregate
/// under their recorded id; correlation with descriptors is the caller's
/// concern.
pub fn token_dwell(session: &GazeSession) -> BTreeMap<String, TokenDwell> {
    let mut dwell: BTreeMap<String, TokenDwell> = BTreeMap::new();
    for record in session.records() {
        let entry = dwell.entry(record.token_id.clone()).or_default();
        entry.fixation_count += 1;
        entry.total_dwell_ms += record.duration_ms;
    }
    dwell
}

#[cfg(test)]
#[path = "../../tests/unit/session/stats.rs"]
mod tests;
