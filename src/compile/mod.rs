//! Frame compilation: replay state in, backend-agnostic draw ops out.
//!
//! Layer builders are pure functions over the evaluated view; `plan` owns the
//! fixed layer ordering and flag gating.

pub(crate) mod backdrop;
pub(crate) mod heatmap;
pub(crate) mod markers;
pub(crate) mod path;
pub(crate) mod plan;
