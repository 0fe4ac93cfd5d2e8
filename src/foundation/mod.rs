//! Shared foundation types: time, canvas, color, error taxonomy.

pub(crate) mod core;
pub(crate) mod error;
