use crate::foundation::core::{Canvas, FrameIndex};
use crate::render::backend::FrameRGBA;

/// Immutable copy of the live source captured on one tick.
///
/// The pixels may be stored below source resolution (see [`FrameSnapshot::capture`]); `source`
/// keeps the capture size so drawing can scale back up.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    tick: FrameIndex,
    source: Canvas,
    frame: FrameRGBA,
}

impl FrameSnapshot {
    /// Copy `live`, downscaled by `scale` (clamped to `(0, 1]`).
    ///
    /// Returns `None` when `live` has no valid pixels yet.
    pub fn capture(live: &FrameRGBA, scale: f32, tick: FrameIndex) -> Option<Self> {
        if !live.is_ready() {
            return None;
        }
        let scale = if scale.is_finite() {
            scale.clamp(f32::MIN_POSITIVE, 1.0)
        } else {
            1.0
        };
        let w = ((live.width as f32 * scale).round() as u32).max(1);
        let h = ((live.height as f32 * scale).round() as u32).max(1);

        let frame = if w == live.width && h == live.height {
            live.clone()
        } else {
            downscale(live, w, h)?
        };
        Some(Self {
            tick,
            source: live.canvas(),
            frame,
        })
    }

    /// Tick on which this snapshot was captured.
    pub fn tick(&self) -> FrameIndex {
        self.tick
    }

    /// Size of the live frame this was captured from.
    pub fn source_canvas(&self) -> Canvas {
        self.source
    }

    /// Stored pixels (possibly downscaled).
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    pub fn byte_len(&self) -> usize {
        self.frame.data.len()
    }
}

fn downscale(live: &FrameRGBA, w: u32, h: u32) -> Option<FrameRGBA> {
    // Resampling premultiplied pixels keeps edges free of dark fringes.
    let src = image::RgbaImage::from_raw(live.width, live.height, live.data.clone())?;
    let out = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);
    Some(FrameRGBA {
        width: w,
        height: h,
        data: out.into_raw(),
        premultiplied: live.premultiplied,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/frames/snapshot.rs"]
mod tests;
