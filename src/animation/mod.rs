/// Easing curves and the clone pop/ramp shapes.
pub mod ease;
