/// Convenience result type used across stickerkit.
pub type StickerResult<T> = Result<T, StickerError>;

/// Top-level error taxonomy used by compositor, collaborator and pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    /// Non-positive or out-of-range output size or supersample factor.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A symbolic asset name could not be resolved to a decodable image.
    #[error("asset unresolved: {0}")]
    AssetUnresolved(String),

    /// The flattened raster could not be encoded.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Invalid user-provided or canvas data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No element with the given id is placed on the canvas.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// No saved work with the given id exists in the store.
    #[error("work not found: {0}")]
    WorkNotFound(String),

    /// The export destination refused the write.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The work store failed to persist or read data.
    #[error("store error: {0}")]
    Store(String),

    /// The export sink failed to write data.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickerError {
    /// Build a [`StickerError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`StickerError::AssetUnresolved`] value.
    pub fn asset_unresolved(msg: impl Into<String>) -> Self {
        Self::AssetUnresolved(msg.into())
    }

    /// Build a [`StickerError::EncodingFailed`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    /// Build a [`StickerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StickerError::ElementNotFound`] value.
    pub fn element_not_found(msg: impl Into<String>) -> Self {
        Self::ElementNotFound(msg.into())
    }

    /// Build a [`StickerError::WorkNotFound`] value.
    pub fn work_not_found(msg: impl Into<String>) -> Self {
        Self::WorkNotFound(msg.into())
    }

    /// Build a [`StickerError::PermissionDenied`] value.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Build a [`StickerError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`StickerError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`StickerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
