use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{ShadowcastError, ShadowcastResult};
use crate::render::backend::{
    DrawSurface, FramePlacement, FrameRGBA, byte_len, premultiply_rgba8_in_place,
};

/// Flattening tolerance for particle circles, in pixels.
const CIRCLE_TOLERANCE: f64 = 0.1;

/// CPU draw surface powered by `vello_cpu`.
///
/// Draw calls are recorded between [`DrawSurface::clear`] and [`CpuSurface::finish`], which
/// rasterizes them in order and reads back the pixels.
pub struct CpuSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> ShadowcastResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Reallocate for a new size. Recorded draw calls are discarded.
    pub fn resize(&mut self, canvas: Canvas) -> ShadowcastResult<()> {
        if canvas == self.canvas {
            return Ok(());
        }
        let (w, h) = surface_dims(canvas)?;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.canvas = canvas;
        tracing::debug!(width = canvas.width, height = canvas.height, "cpu surface resized");
        Ok(())
    }

    /// Rasterize everything recorded since the last clear and read back premultiplied pixels.
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, rgba: [u8; 4]) {
        self.ctx.reset();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
        self.ctx.fill_rect(&rect_to_cpu(self.canvas.rect()));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, rgba: [u8; 4], opacity: f32) {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        if opacity <= 0.0 || radius.is_nan() || radius <= 0.0 || rgba[3] == 0 {
            return;
        }
        let a = (f32::from(rgba[3]) * opacity).round() as u8;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], a));
        let circle = vello_cpu::kurbo::Circle::new((center.x, center.y), radius);
        self.ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
    }

    fn draw_frame(&mut self, frame: &FrameRGBA, placement: &FramePlacement) {
        let opacity = if placement.opacity.is_nan() {
            0.0
        } else {
            placement.opacity.clamp(0.0, 1.0)
        };
        let clip = placement.clip.intersect(frame.canvas().rect());
        if opacity <= 0.0 || clip.width() <= 0.0 || clip.height() <= 0.0 {
            return;
        }
        let image = match frame_to_image(frame) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(error = %e, "skipping frame that cannot be uploaded");
                return;
            }
        };

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(placement.transform));
        self.ctx.set_paint(image);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&rect_to_cpu(clip));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn surface_dims(canvas: Canvas) -> ShadowcastResult<(u16, u16)> {
    if canvas.is_empty() {
        return Err(ShadowcastError::render("surface dimensions must be non-zero"));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ShadowcastError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ShadowcastError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn frame_to_image(frame: &FrameRGBA) -> ShadowcastResult<vello_cpu::Image> {
    let pixmap = if frame.premultiplied {
        pixmap_from_premul_bytes(&frame.data, frame.width, frame.height)?
    } else {
        let mut tmp = frame.data.clone();
        premultiply_rgba8_in_place(&mut tmp);
        pixmap_from_premul_bytes(&tmp, frame.width, frame.height)?
    };
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ShadowcastResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ShadowcastError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ShadowcastError::render("pixmap height exceeds u16"))?;
    if w == 0 || h == 0 || Some(bytes.len()) != byte_len(width, height) {
        return Err(ShadowcastError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
