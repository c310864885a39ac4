use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::compositor::Compositor;
use crate::render::encode::{OutputFormat, encode_frame};
use crate::render::thumbnail::{DEFAULT_THUMBNAIL_MAX, DEFAULT_THUMBNAIL_QUALITY, thumbnail_jpeg};
use crate::scene::canvas::Canvas;
use crate::store::export::{ExportReceipt, ExportSink};
use crate::store::works::{WorkRecord, WorkStore, current_timestamp_ms};

/// Thumbnail settings for saved works.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SavePipelineOpts {
    /// Longest thumbnail edge in pixels.
    pub thumbnail_max: u32,
    /// Thumbnail JPEG quality.
    pub thumbnail_quality: u8,
}

impl Default for SavePipelineOpts {
    fn default() -> Self {
        Self {
            thumbnail_max: DEFAULT_THUMBNAIL_MAX,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
        }
    }
}

impl SavePipelineOpts {
    /// Set the longest thumbnail edge.
    pub fn with_thumbnail_max(mut self, max: u32) -> Self {
        self.thumbnail_max = max;
        self
    }

    /// Set thumbnail JPEG quality, clamped to `1..=100`.
    pub fn with_thumbnail_quality(mut self, quality: u8) -> Self {
        self.thumbnail_quality = quality.clamp(1, 100);
        self
    }
}

/// Outcome of one save. Each sink reports independently; nothing is rolled back.
#[derive(Debug)]
pub struct SaveReport {
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
    /// Work gallery result.
    pub work: StickerResult<WorkRecord>,
    /// External export result.
    pub export: StickerResult<ExportReceipt>,
}

impl SaveReport {
    /// Both destinations succeeded.
    pub fn is_complete(&self) -> bool {
        self.work.is_ok() && self.export.is_ok()
    }
}

/// Render a canvas once and hand the result to the work store and export sink.
#[derive(Clone)]
pub struct SavePipeline {
    compositor: Arc<Compositor>,
    works: Arc<dyn WorkStore>,
    export: Arc<dyn ExportSink>,
    opts: SavePipelineOpts,
}

impl std::fmt::Debug for SavePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavePipeline")
            .field("compositor", &self.compositor)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl SavePipeline {
    /// Pipeline with default thumbnail settings.
    pub fn new(
        compositor: Arc<Compositor>,
        works: Arc<dyn WorkStore>,
        export: Arc<dyn ExportSink>,
    ) -> Self {
        Self::with_opts(compositor, works, export, SavePipelineOpts::default())
    }

    /// Pipeline with explicit thumbnail settings.
    pub fn with_opts(
        compositor: Arc<Compositor>,
        works: Arc<dyn WorkStore>,
        export: Arc<dyn ExportSink>,
        opts: SavePipelineOpts,
    ) -> Self {
        Self {
            compositor,
            works,
            export,
            opts,
        }
    }

    /// Flatten `canvas` and persist it.
    ///
    /// Render or thumbnail failure is returned as the error and no sink is touched. Otherwise
    /// both sinks run concurrently and their outcomes land in the [`SaveReport`].
    #[tracing::instrument(skip(self, canvas), fields(elements = canvas.elements.len()))]
    pub async fn save(
        &self,
        canvas: Canvas,
        viewport: Size,
        supersample: f64,
    ) -> StickerResult<SaveReport> {
        let compositor = Arc::clone(&self.compositor);
        let opts = self.opts;
        let (composite, thumbnail) = tokio::task::spawn_blocking(move || {
            let frame = compositor.flatten(&canvas, viewport, supersample)?;
            let thumbnail = thumbnail_jpeg(&frame, opts.thumbnail_max, opts.thumbnail_quality)?;
            // Gallery and photo exports are always JPEG.
            let out = encode_frame(&frame, OutputFormat::Jpeg, compositor.opts().jpeg_quality)?;
            Ok::<_, StickerError>(((frame.width, frame.height, out), thumbnail))
        })
        .await
        .map_err(|e| StickerError::Other(anyhow::anyhow!("render task failed: {e}")))??;

        let (width, height, image) = composite;
        let image = Arc::new(image);
        let created_at_ms = current_timestamp_ms();

        let works = Arc::clone(&self.works);
        let work_image = Arc::clone(&image);
        let work_task = tokio::task::spawn_blocking(move || {
            works.save(&work_image, Some(&thumbnail), created_at_ms)
        });

        let export = Arc::clone(&self.export);
        let export_image = Arc::clone(&image);
        let export_task = tokio::task::spawn_blocking(move || export.export(&export_image));

        let (work, export) = tokio::join!(work_task, export_task);
        let work = flatten_outcome(work);
        let export = flatten_outcome(export);

        if let Err(err) = &work {
            tracing::warn!(error = %err, "saving to work gallery failed");
        }
        if let Err(err) = &export {
            tracing::warn!(error = %err, "export failed");
        }

        Ok(SaveReport {
            width,
            height,
            work,
            export,
        })
    }
}

fn flatten_outcome<T>(
    joined: Result<StickerResult<T>, tokio::task::JoinError>,
) -> StickerResult<T> {
    joined.map_err(|e| StickerError::Other(anyhow::anyhow!("sink task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/session/save.rs"]
mod tests;
