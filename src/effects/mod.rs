pub mod mask;
/// Burst particles emitted on clone transitions.
pub mod particles;
