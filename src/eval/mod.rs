//! Pure temporal queries: what is visible and what is active at time t.

pub(crate) mod view;
