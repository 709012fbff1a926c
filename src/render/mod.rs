//! CPU rendering: the scene drawing context and the fixed-order frame pipeline.

pub mod context;
pub mod pipeline;
