use crate::foundation::core::Canvas;
use crate::foundation::error::{ShadowcastError, ShadowcastResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::backend::FrameRGBA;

/// Per-pixel foreground coverage produced by a segmentation model (255 = subject).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentationMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SegmentationMask {
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> ShadowcastResult<Self> {
        let expected = (width as usize).saturating_mul(height as usize);
        if width == 0 || height == 0 {
            return Err(ShadowcastError::validation("mask dimensions must be non-zero"));
        }
        if alpha.len() != expected {
            return Err(ShadowcastError::validation(format!(
                "mask len mismatch: expected {expected} for {width}x{height}, got {}",
                alpha.len()
            )));
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Build from per-pixel confidences in `[0, 1]` (values outside are clamped).
    pub fn from_confidence(width: u32, height: u32, confidence: &[f32]) -> ShadowcastResult<Self> {
        let alpha = confidence
            .iter()
            .map(|&c| {
                let c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
                (c * 255.0).round() as u8
            })
            .collect();
        Self::new(width, height, alpha)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Coverage at frame pixel `(x, y)` of a `frame_w x frame_h` frame, nearest-neighbour.
    fn sample(&self, x: u32, y: u32, frame_w: u32, frame_h: u32) -> u8 {
        let mx = ((u64::from(x) * u64::from(self.width)) / u64::from(frame_w.max(1))) as usize;
        let my = ((u64::from(y) * u64::from(self.height)) / u64::from(frame_h.max(1))) as usize;
        let mx = mx.min(self.width as usize - 1);
        let my = my.min(self.height as usize - 1);
        self.alpha[my * self.width as usize + mx]
    }
}

/// Keep only the masked subject of `source`, writing the result into `scratch`.
///
/// Destination-in composite: every premultiplied channel is scaled by mask coverage. The mask is
/// stretched to the source size. `scratch` is resized to match `source`.
pub fn apply_mask_into(
    source: &FrameRGBA,
    mask: &SegmentationMask,
    scratch: &mut FrameRGBA,
) -> ShadowcastResult<()> {
    if !source.is_ready() {
        return Err(ShadowcastError::validation("cannot mask a frame without pixels"));
    }
    if scratch.width != source.width || scratch.height != source.height {
        scratch.reset_to(source.width, source.height);
    }
    scratch.premultiplied = source.premultiplied;

    let w = source.width;
    let h = source.height;
    let row_len = w as usize * 4;
    for y in 0..h {
        let row = y as usize * row_len;
        for x in 0..w {
            let idx = row + x as usize * 4;
            let m = u16::from(mask.sample(x, y, w, h));
            let src = &source.data[idx..idx + 4];
            for (d, s) in scratch.data[idx..idx + 4].iter_mut().zip(src) {
                *d = mul_div255_u8(u16::from(*s), m);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
