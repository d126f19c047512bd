//! Shadowcast composites time-delayed "clones" of a live subject around the subject itself.
//!
//! Each tick the [`CompositingPipeline`] captures the live frame into a bounded history, advances
//! the clone lifecycle and the particle bursts it triggers, and draws everything onto a
//! [`DrawSurface`]:
//!
//! - Spawn or dismiss clones with [`CompositingPipeline::spawn_all`] and
//!   [`CompositingPipeline::dismiss_all`]
//! - Drive it with [`CompositingPipeline::tick`] once per display refresh
//! - Read pixels back from a [`CpuSurface`] for display or recording
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub mod clones;
pub mod effects;
mod foundation;
pub mod frames;
pub mod render;
pub mod session;

pub use crate::foundation::core::{Affine, Canvas, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ShadowcastError, ShadowcastResult};
pub use crate::foundation::rng::{RandomSource, Rng64};

pub use crate::animation::ease::Ease;
pub use crate::clones::animator::{
    CloneAnimator, CloneAnimatorOpts, CloneEvent, CloneId, CloneState, DelayedClone,
};
pub use crate::clones::placement::{
    Placement, PlacementOpts, min_pairwise_distance, place_clones,
};
pub use crate::clones::visuals::{CloneLook, CloneVisuals, RevealWindow};
pub use crate::effects::mask::{SegmentationMask, apply_mask_into};
pub use crate::effects::particles::{Particle, ParticleKind, ParticleOpts, ParticleSystem};
pub use crate::frames::ring::{DEFAULT_HISTORY_CAPACITY, FrameRingBuffer};
pub use crate::frames::snapshot::FrameSnapshot;
pub use crate::render::backend::{DrawSurface, FramePlacement, FrameRGBA};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::pipeline::{CompositingPipeline, TickReport};
pub use crate::session::collaborators::{FrameSource, Segmenter, SharedMask};
pub use crate::session::config::{EngineConfig, HistoryConfig, QualitySettings, QualityTier};
