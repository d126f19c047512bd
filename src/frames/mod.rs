/// Bounded history of past live frames.
pub mod ring;
pub mod snapshot;
