use std::sync::Arc;

use crate::assets::provider::AssetProvider;
use crate::foundation::core::{Affine, PixelSize, Size, Vec2, aspect_fill, aspect_fit};
use crate::foundation::error::StickerResult;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuRasterizer;
use crate::render::encode::{DEFAULT_JPEG_QUALITY, OutputFormat, encode_frame};
use crate::scene::canvas::{Canvas, ELEMENT_BASE_SIZE, PlacedElement};

/// Compositor knobs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompositorOpts {
    /// Straight-alpha color under everything; shows when no background resolves.
    pub clear_rgba: [u8; 4],
    /// Encoding used by [`Compositor::render`].
    pub format: OutputFormat,
    /// JPEG quality in `1..=100`.
    pub jpeg_quality: u8,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 255],
            format: OutputFormat::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CompositorOpts {
    /// Set the clear color.
    pub fn with_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.clear_rgba = rgba;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set JPEG quality, clamped to `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Encoded composite plus its pixel size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeOutput {
    /// Output width in pixels.
    pub pixel_width: u32,
    /// Output height in pixels.
    pub pixel_height: u32,
    /// Encoding of `image_bytes`.
    pub format: OutputFormat,
    /// Encoded image.
    pub image_bytes: Vec<u8>,
}

/// Flattens a [`Canvas`] into a single raster.
///
/// Coordinates in the canvas are logical viewport units; `supersample` maps them to output
/// pixels, so the same canvas renders at any resolution.
#[derive(Clone)]
pub struct Compositor {
    assets: Arc<dyn AssetProvider>,
    opts: CompositorOpts,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor with default options.
    pub fn new(assets: Arc<dyn AssetProvider>) -> Self {
        Self::with_opts(assets, CompositorOpts::default())
    }

    /// Compositor with explicit options.
    pub fn with_opts(assets: Arc<dyn AssetProvider>, opts: CompositorOpts) -> Self {
        Self { assets, opts }
    }

    /// Current options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Render `canvas` to premultiplied RGBA8 at `round(output_size * supersample)`.
    ///
    /// Backgrounds that cannot be resolved or drawn fall back along the canvas chain and finally
    /// to the clear color. Elements that cannot be resolved or drawn are skipped. Neither is an
    /// error.
    pub fn flatten(
        &self,
        canvas: &Canvas,
        output_size: Size,
        supersample: f64,
    ) -> StickerResult<FrameRGBA> {
        let px = output_size.to_pixels(supersample)?;
        let mut raster = CpuRasterizer::new(px)?;
        raster.fill_solid(self.opts.clear_rgba);

        self.draw_background(&mut raster, canvas, px);

        for el in &canvas.elements {
            self.draw_element(&mut raster, el, supersample);
        }

        Ok(raster.finish())
    }

    /// [`flatten`](Self::flatten) then encode with the configured format.
    #[tracing::instrument(
        skip(self, canvas),
        fields(elements = canvas.elements.len(), format = ?self.opts.format)
    )]
    pub fn render(
        &self,
        canvas: &Canvas,
        output_size: Size,
        supersample: f64,
    ) -> StickerResult<CompositeOutput> {
        let frame = self.flatten(canvas, output_size, supersample)?;
        let image_bytes = encode_frame(&frame, self.opts.format, self.opts.jpeg_quality)?;
        tracing::debug!(
            width = frame.width,
            height = frame.height,
            bytes = image_bytes.len(),
            "composite encoded"
        );
        Ok(CompositeOutput {
            pixel_width: frame.width,
            pixel_height: frame.height,
            format: self.opts.format,
            image_bytes,
        })
    }

    fn draw_background(&self, raster: &mut CpuRasterizer, canvas: &Canvas, px: PixelSize) {
        for name in canvas.background_chain() {
            let img = match self.assets.resolve(name) {
                Ok(img) => img,
                Err(err) => {
                    tracing::warn!(background = name, error = %err, "background unavailable, falling back");
                    continue;
                }
            };
            let fill = aspect_fill(
                f64::from(img.width),
                f64::from(img.height),
                f64::from(px.width),
                f64::from(px.height),
            );
            match raster.draw_image(&img, fill) {
                Ok(()) => return,
                Err(err) => {
                    tracing::warn!(background = name, error = %err, "background not drawable, falling back");
                }
            }
        }
        tracing::debug!("no background resolved, using clear color");
    }

    fn draw_element(&self, raster: &mut CpuRasterizer, el: &PlacedElement, supersample: f64) {
        if let Err(err) = el.validate() {
            tracing::warn!(element = %el.id, error = %err, "skipping invalid element");
            return;
        }
        let img = match self.assets.resolve(&el.asset_ref) {
            Ok(img) => img,
            Err(err) => {
                tracing::warn!(element = %el.id, asset = %el.asset_ref, error = %err, "skipping element");
                return;
            }
        };

        let transform = element_transform(el, img.width, img.height, supersample);
        if let Err(err) = raster.draw_image(&img, transform) {
            tracing::warn!(element = %el.id, asset = %el.asset_ref, error = %err, "skipping undrawable element");
        }
    }
}

/// Image space of an element asset into output pixels.
///
/// The image is aspect-fit into the base square centered on the element's local origin.
pub fn element_transform(el: &PlacedElement, image_w: u32, image_h: u32, supersample: f64) -> Affine {
    let half = ELEMENT_BASE_SIZE * 0.5;
    el.local_to_output(supersample)
        * Affine::translate(Vec2::new(-half, -half))
        * aspect_fit(
            f64::from(image_w),
            f64::from(image_h),
            ELEMENT_BASE_SIZE,
            ELEMENT_BASE_SIZE,
        )
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
