//! Interfaces to the systems around the compositor: the live camera feed and person
//! segmentation. Both are polled once per tick and never awaited.

use std::sync::{Arc, Mutex, TryLockError};

use crate::effects::mask::SegmentationMask;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ShadowcastError, ShadowcastResult};
use crate::render::backend::FrameRGBA;

/// Continuously updating live image.
pub trait FrameSource {
    /// Size of the current frame, or `None` while the source has not produced valid pixels.
    fn dimensions(&self) -> Option<Canvas>;

    /// The current frame. Only called when [`FrameSource::dimensions`] reported a valid size.
    fn current_frame(&self) -> Option<&FrameRGBA>;
}

impl FrameSource for FrameRGBA {
    fn dimensions(&self) -> Option<Canvas> {
        self.is_ready().then(|| self.canvas())
    }

    fn current_frame(&self) -> Option<&FrameRGBA> {
        self.is_ready().then_some(self)
    }
}

impl FrameSource for Option<FrameRGBA> {
    fn dimensions(&self) -> Option<Canvas> {
        self.as_ref().and_then(|f| f.dimensions())
    }

    fn current_frame(&self) -> Option<&FrameRGBA> {
        self.as_ref().and_then(|f| f.current_frame())
    }
}

/// Person segmentation, read as "latest available mask or none".
///
/// Implementations own their inference cadence and backpressure; this call must return
/// immediately. Errors are absorbed by the pipeline and treated as "no mask" for that tick.
pub trait Segmenter {
    fn latest_mask(&mut self) -> ShadowcastResult<Option<Arc<SegmentationMask>>>;
}

/// Latest-value mask slot shared between an inference thread (publisher) and the render loop.
///
/// Reading never blocks: if the publisher holds the lock, the last mask this handle saw is
/// returned instead.
#[derive(Clone, Debug, Default)]
pub struct SharedMask {
    slot: Arc<Mutex<Option<Arc<SegmentationMask>>>>,
    last_seen: Option<Arc<SegmentationMask>>,
}

impl SharedMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published mask.
    pub fn publish(&self, mask: SegmentationMask) -> ShadowcastResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ShadowcastError::collaborator("mask slot poisoned"))?;
        *slot = Some(Arc::new(mask));
        Ok(())
    }

    /// Withdraw the published mask (e.g. the subject left the frame).
    pub fn retract(&self) -> ShadowcastResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ShadowcastError::collaborator("mask slot poisoned"))?;
        *slot = None;
        Ok(())
    }
}

impl Segmenter for SharedMask {
    fn latest_mask(&mut self) -> ShadowcastResult<Option<Arc<SegmentationMask>>> {
        match self.slot.try_lock() {
            Ok(slot) => {
                self.last_seen = slot.clone();
                Ok(self.last_seen.clone())
            }
            Err(TryLockError::WouldBlock) => Ok(self.last_seen.clone()),
            Err(TryLockError::Poisoned(_)) => {
                Err(ShadowcastError::collaborator("mask slot poisoned"))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/collaborators.rs"]
mod tests;
