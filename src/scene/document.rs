use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{PixelSize, Size};
use crate::foundation::error::{StickerError, StickerResult};
use crate::scene::canvas::Canvas;

/// Default export oversampling relative to the editing viewport.
pub const DEFAULT_SUPERSAMPLE: f64 = 3.0;

fn default_supersample() -> f64 {
    DEFAULT_SUPERSAMPLE
}

/// A canvas plus the viewport it was edited in, as exchanged in JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasDocument {
    /// Logical size of the editing viewport.
    pub viewport: Size,
    /// Output oversampling factor.
    #[serde(default = "default_supersample")]
    pub supersample: f64,
    /// The scene itself.
    pub canvas: Canvas,
}

impl CanvasDocument {
    /// Wrap `canvas` with the default supersample factor.
    pub fn new(viewport: Size, canvas: Canvas) -> Self {
        Self {
            viewport,
            supersample: DEFAULT_SUPERSAMPLE,
            canvas,
        }
    }

    /// Validate viewport, supersample and canvas invariants.
    pub fn validate(&self) -> StickerResult<()> {
        self.output_pixels()?;
        self.canvas.validate()
    }

    /// Pixel dimensions a render of this document produces.
    pub fn output_pixels(&self) -> StickerResult<PixelSize> {
        self.viewport.to_pixels(self.supersample)
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(s: &str) -> StickerResult<Self> {
        serde_json::from_str(s).map_err(|e| StickerError::serde(format!("canvas document: {e}")))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> StickerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StickerError::serde(format!("canvas document: {e}")))
    }

    /// Read and validate a document from a file.
    pub fn read(path: &Path) -> StickerResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read canvas document '{}'", path.display()))?;
        let doc = Self::from_json_str(&text)?;
        doc.validate()?;
        Ok(doc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
