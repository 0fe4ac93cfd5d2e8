//! Interactive replay driving: discrete commands and host frame callbacks
//! in, redraw and scheduling obligations out.

pub(crate) mod engine;
