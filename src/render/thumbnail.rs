use image::imageops::FilterType;

use crate::foundation::core::PixelSize;
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::backend::FrameRGBA;
use crate::render::encode::{OutputFormat, encode_frame};

/// Longest edge of gallery thumbnails.
pub const DEFAULT_THUMBNAIL_MAX: u32 = 600;
/// JPEG quality of gallery thumbnails.
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 80;

/// Target size for fitting `width x height` within `max_dimension` on its longest edge.
///
/// Sizes already inside the bound are returned unchanged. Otherwise the longer side becomes
/// exactly `max_dimension` and the shorter one is rounded, never below 1.
pub fn thumbnail_dimensions(width: u32, height: u32, max_dimension: u32) -> StickerResult<PixelSize> {
    if max_dimension == 0 {
        return Err(StickerError::validation("thumbnail max dimension must be > 0"));
    }
    if width == 0 || height == 0 {
        return Err(StickerError::invalid_dimensions(format!(
            "cannot thumbnail an empty {width}x{height} image"
        )));
    }

    let longest = width.max(height);
    if longest <= max_dimension {
        return Ok(PixelSize { width, height });
    }

    let factor = f64::from(max_dimension) / f64::from(longest);
    let fit = |v: u32| {
        if v == longest {
            max_dimension
        } else {
            ((f64::from(v) * factor).round() as u32).clamp(1, max_dimension)
        }
    };
    Ok(PixelSize {
        width: fit(width),
        height: fit(height),
    })
}

/// Downscale `source` uniformly so its longest edge is at most `max_dimension`. No cropping.
pub fn fit_thumbnail(source: image::RgbaImage, max_dimension: u32) -> StickerResult<image::RgbaImage> {
    let (w, h) = source.dimensions();
    let target = thumbnail_dimensions(w, h, max_dimension)?;
    if target.width == w && target.height == h {
        return Ok(source);
    }
    Ok(image::imageops::resize(
        &source,
        target.width,
        target.height,
        FilterType::Triangle,
    ))
}

/// Thumbnail a flattened frame and encode it as JPEG.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn thumbnail_jpeg(frame: &FrameRGBA, max_dimension: u32, quality: u8) -> StickerResult<Vec<u8>> {
    let thumb = fit_thumbnail(frame.to_rgba_image()?, max_dimension)?;
    let (width, height) = thumb.dimensions();
    let thumb_frame = FrameRGBA {
        width,
        height,
        data: thumb.into_raw(),
        premultiplied: false,
    };
    encode_frame(&thumb_frame, OutputFormat::Jpeg, quality)
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
