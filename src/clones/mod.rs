//! Clone lifecycle: where clones go, how long they take, and how they look on each tick.

pub mod animator;
pub mod placement;
pub mod visuals;
