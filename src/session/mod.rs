/// Interfaces to the camera feed and segmentation.
pub mod collaborators;
/// JSON engine config and adaptive-quality presets.
pub mod config;
