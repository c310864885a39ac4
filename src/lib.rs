//! stickerkit composes themed sticker wallpapers.
//!
//! A [`Canvas`] holds a background plus ordered sticker elements in logical viewport units. The
//! [`Compositor`] flattens it at any supersample factor into a single raster, and the
//! [`SavePipeline`] writes the result to the personal work gallery and an export destination:
//!
//! - Resolve images through an [`AssetProvider`]
//! - Flatten with [`Compositor::flatten`] or encode with [`Compositor::render`]
//! - Persist with [`SavePipeline::save`] into a [`WorkStore`] and an [`ExportSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod render;
mod scene;
mod session;
mod store;

pub use crate::foundation::core::{
    Affine, MAX_PIXEL_EDGE, PixelSize, Point, Rect, Rgba8Premul, Size, Vec2, aspect_fill,
    aspect_fit,
};
pub use crate::foundation::error::{StickerError, StickerResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::provider::{
    AssetProvider, DirAssetProvider, MemoryAssetProvider, normalize_rel_path,
};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::compositor::{
    CompositeOutput, Compositor, CompositorOpts, element_transform,
};
pub use crate::render::encode::{DEFAULT_JPEG_QUALITY, OutputFormat, encode_frame};
pub use crate::render::thumbnail::{
    DEFAULT_THUMBNAIL_MAX, DEFAULT_THUMBNAIL_QUALITY, fit_thumbnail, thumbnail_dimensions,
    thumbnail_jpeg,
};
pub use crate::scene::canvas::{Canvas, ELEMENT_BASE_SIZE, ElementId, PlacedElement};
pub use crate::scene::catalog::{Catalog, StickerTheme, Wallpaper, WallpaperCategory};
pub use crate::scene::document::{CanvasDocument, DEFAULT_SUPERSAMPLE};
pub use crate::scene::editor::GestureTracker;
pub use crate::session::save::{SavePipeline, SavePipelineOpts, SaveReport};
pub use crate::store::export::{DirExportSink, ExportReceipt, ExportSink, PermissionStatus};
pub use crate::store::works::{FsWorkStore, WorkRecord, WorkStore, current_timestamp_ms};
