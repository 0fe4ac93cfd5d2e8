//! Playback control: the clock state machine and layer visibility state.

pub(crate) mod clock;
pub(crate) mod state;
