//! Render backends: a compiled [`RenderPlan`](crate::compile::plan::RenderPlan)
//! goes in, premultiplied RGBA8 pixels come out.

pub(crate) mod backend;
pub(crate) mod cpu;
