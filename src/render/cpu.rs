use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, PixelSize};
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::backend::FrameRGBA;

/// Immediate-mode CPU raster target backed by `vello_cpu`.
///
/// Draw calls are recorded in submission order and resolved into pixels by [`finish`], so later
/// draws land on top of earlier ones.
///
/// [`finish`]: CpuRasterizer::finish
pub(crate) struct CpuRasterizer {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl CpuRasterizer {
    pub(crate) fn new(size: PixelSize) -> StickerResult<Self> {
        let width: u16 = size
            .width
            .try_into()
            .map_err(|_| StickerError::invalid_dimensions("raster width exceeds u16"))?;
        let height: u16 = size
            .height
            .try_into()
            .map_err(|_| StickerError::invalid_dimensions("raster height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(StickerError::invalid_dimensions("raster must be non-empty"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.reset();
        Ok(Self { width, height, ctx })
    }

    /// Cover the whole target with a straight-alpha RGBA color.
    pub(crate) fn fill_solid(&mut self, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    /// Draw `image` with its pixel space mapped into the target by `transform`.
    ///
    /// Whatever falls outside the target bounds is clipped.
    pub(crate) fn draw_image(
        &mut self,
        image: &PreparedImage,
        transform: Affine,
    ) -> StickerResult<()> {
        let paint = image_paint(image)?;
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    /// Resolve recorded draws into a premultiplied frame.
    pub(crate) fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn image_paint(image: &PreparedImage) -> StickerResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> StickerResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StickerError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StickerError::validation("image height exceeds u16"))?;
    let expected = PixelSize { width, height }.rgba_len();
    if bytes.len() != expected {
        return Err(StickerError::validation("image byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
