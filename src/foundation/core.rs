use crate::foundation::error::{StickerError, StickerResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest raster edge the CPU rasterizer accepts.
pub const MAX_PIXEL_EDGE: u32 = u16::MAX as u32;

/// Logical (point) size of an editing viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
}

impl Size {
    /// Construct a size without validation.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Return `true` when both axes are finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Pixel dimensions for this size at `supersample`, rounded to the nearest integer.
    ///
    /// Fails with [`StickerError::InvalidDimensions`] for non-positive inputs and for results
    /// that are zero or exceed [`MAX_PIXEL_EDGE`].
    pub fn to_pixels(self, supersample: f64) -> StickerResult<PixelSize> {
        if !self.is_positive() {
            return Err(StickerError::invalid_dimensions(format!(
                "output size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !supersample.is_finite() || supersample <= 0.0 {
            return Err(StickerError::invalid_dimensions(format!(
                "supersample must be positive, got {supersample}"
            )));
        }

        let w = (self.width * supersample).round();
        let h = (self.height * supersample).round();
        let max = f64::from(MAX_PIXEL_EDGE);
        if w < 1.0 || h < 1.0 || w > max || h > max {
            return Err(StickerError::invalid_dimensions(format!(
                "pixel size {w}x{h} is outside 1..={MAX_PIXEL_EDGE}"
            )));
        }

        Ok(PixelSize {
            width: w as u32,
            height: h as u32,
        })
    }
}

/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque black, the default blank background.
    pub fn opaque_black() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Uniform scale and offset that makes a `src` rectangle cover `dst` completely, centered.
///
/// The overflowing axis extends past `dst` equally on both sides; the caller clips to `dst`.
pub fn aspect_fill(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64) -> Affine {
    if src_w <= 0.0 || src_h <= 0.0 {
        return Affine::IDENTITY;
    }
    let s = (dst_w / src_w).max(dst_h / src_h);
    let dx = (dst_w - src_w * s) * 0.5;
    let dy = (dst_h - src_h * s) * 0.5;
    Affine::translate(Vec2::new(dx, dy)) * Affine::scale(s)
}

/// Uniform scale and offset that fits a `src` rectangle entirely inside `dst`, centered.
pub fn aspect_fit(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64) -> Affine {
    if src_w <= 0.0 || src_h <= 0.0 {
        return Affine::IDENTITY;
    }
    let s = (dst_w / src_w).min(dst_h / src_h);
    let dx = (dst_w - src_w * s) * 0.5;
    let dy = (dst_h - src_h * s) * 0.5;
    Affine::translate(Vec2::new(dx, dy)) * Affine::scale(s)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
