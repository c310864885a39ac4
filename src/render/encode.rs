use std::io::Cursor;

use image::ImageEncoder;

use crate::foundation::error::{StickerError, StickerResult};
use crate::foundation::math::{
    premul_over_opaque_rgb8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::render::backend::FrameRGBA;

/// Default JPEG quality for exported composites.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Compressed image format for composite output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossy JPEG; alpha is flattened onto black.
    #[default]
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Encode a frame. `quality` only applies to JPEG and is clamped to `1..=100`.
pub fn encode_frame(frame: &FrameRGBA, format: OutputFormat, quality: u8) -> StickerResult<Vec<u8>> {
    let expected = frame.size().rgba_len();
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(StickerError::encoding(format!(
            "frame buffer is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    match format {
        OutputFormat::Jpeg => encode_jpeg(frame, quality),
        OutputFormat::Png => encode_png(frame),
    }
}

fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> StickerResult<Vec<u8>> {
    let rgb = if frame.premultiplied {
        premul_over_opaque_rgb8(&frame.data, [0, 0, 0])
    } else {
        let mut premul = frame.data.clone();
        premultiply_rgba8_in_place(&mut premul);
        premul_over_opaque_rgb8(&premul, [0, 0, 0])
    };

    let mut buf = Cursor::new(Vec::new());
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| StickerError::encoding(format!("JPEG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

fn encode_png(frame: &FrameRGBA) -> StickerResult<Vec<u8>> {
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }

    let mut buf = Cursor::new(Vec::new());
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    encoder
        .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
        .map_err(|e| StickerError::encoding(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
