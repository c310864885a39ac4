use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{StickerError, StickerResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied RGBA8 bytes, checking the length against the dimensions.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> StickerResult<Self> {
        if width == 0 || height == 0 {
            return Err(StickerError::validation("image dimensions must be non-zero"));
        }
        let size = PixelSize { width, height };
        if data.len() != size.rgba_len() {
            return Err(StickerError::validation(format!(
                "image byte len {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// A single-color image, handy for placeholders and fixtures.
    pub fn solid(width: u32, height: u32, straight_rgba: [u8; 4]) -> StickerResult<Self> {
        let [r, g, b, a] = straight_rgba;
        let px = crate::foundation::core::Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
        let size = PixelSize { width, height };
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(size.rgba_len())
            .collect::<Vec<u8>>();
        Self::from_premul_rgba8(width, height, data)
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> StickerResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage::from_premul_rgba8(width, height, rgba8_premul)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
