//! Session data: fixation records, token descriptors, ingestion, statistics.
//!
//! Everything here is validated once at load time and immutable afterwards;
//! the evaluation and compile stages assume the invariants hold and never
//! re-check them per frame.

pub(crate) mod ingest;
pub(crate) mod model;
pub(crate) mod stats;
pub(crate) mod tokens;
