use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul};
use crate::foundation::error::{ShadowcastError, ShadowcastResult};

/// A frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Wrap premultiplied RGBA8 bytes, checking the length against the dimensions.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ShadowcastResult<Self> {
        let expected = byte_len(width, height)
            .ok_or_else(|| ShadowcastError::validation("frame size overflow"))?;
        if data.len() != expected {
            return Err(ShadowcastError::validation(format!(
                "frame byte len mismatch: expected {expected} for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    /// Wrap straight-alpha RGBA8 bytes (e.g. camera output), premultiplying them.
    pub fn from_straight(width: u32, height: u32, mut data: Vec<u8>) -> ShadowcastResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// A frame filled with one straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]).to_array();
        let n = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// An empty 0x0 frame. Never ready.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Valid dimensions and a buffer that matches them.
    pub fn is_ready(&self) -> bool {
        !self.canvas().is_empty() && byte_len(self.width, self.height) == Some(self.data.len())
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Resize to `width x height`, reusing the allocation. Contents are cleared to transparent.
    pub fn reset_to(&mut self, width: u32, height: u32) {
        let len = byte_len(width, height).unwrap_or(0);
        self.width = width;
        self.height = height;
        self.premultiplied = true;
        self.data.clear();
        self.data.resize(len, 0);
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// How one frame is placed on a surface.
///
/// `clip` is in the frame's own pixel space (before `transform`); only that slice is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlacement {
    /// Frame pixel space -> surface pixel space.
    pub transform: Affine,
    /// Visible region in frame pixel space.
    pub clip: Rect,
    /// Opacity multiplier in `[0, 1]`.
    pub opacity: f32,
}

impl FramePlacement {
    /// Stretch `frame` over the whole `surface`, unclipped and opaque.
    pub fn cover(frame: Canvas, surface: Canvas) -> Self {
        let sx = f64::from(surface.width) / f64::from(frame.width.max(1));
        let sy = f64::from(surface.height) / f64::from(frame.height.max(1));
        Self {
            transform: Affine::scale_non_uniform(sx, sy),
            clip: frame.rect(),
            opacity: 1.0,
        }
    }
}

/// Draw target for one rendered output.
///
/// Each call is self-contained: transform, clip and opacity passed to one call never leak into
/// the next, so clones cannot affect each other's drawing state.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn canvas(&self) -> Canvas;

    /// Discard everything drawn so far and fill with a straight-alpha color.
    fn clear(&mut self, rgba: [u8; 4]);

    /// Fill a circle with a straight-alpha color scaled by `opacity`.
    fn fill_circle(&mut self, center: Point, radius: f64, rgba: [u8; 4], opacity: f32);

    /// Draw `frame` with the given placement.
    fn draw_frame(&mut self, frame: &FrameRGBA, placement: &FramePlacement);
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
