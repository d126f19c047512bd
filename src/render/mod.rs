//! Drawing: the surface abstraction, its CPU implementation, and the per-tick compositor.

/// Frame type and the draw-surface trait.
pub mod backend;
/// `vello_cpu` draw surface.
pub mod cpu;
pub mod pipeline;
