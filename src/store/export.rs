use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::foundation::error::{StickerError, StickerResult};
use crate::store::works::current_timestamp_ms;

/// Authorization state of an export destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Never asked; the first export request decides.
    #[default]
    NotDetermined,
    /// Full access.
    Authorized,
    /// Add-only or partial access; enough to export.
    Limited,
    /// The user said no.
    Denied,
    /// Blocked by policy.
    Restricted,
}

impl PermissionStatus {
    /// Whether an export may write under this status.
    pub fn allows_write(self) -> bool {
        matches!(self, Self::Authorized | Self::Limited)
    }
}

/// Where an exported image ended up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportReceipt {
    /// Sink-specific location of the written image.
    pub location: String,
    /// Bytes written.
    pub bytes_written: usize,
}

/// Destination outside the app, such as the system photo library.
pub trait ExportSink: Send + Sync {
    /// Current authorization without prompting.
    fn permission_status(&self) -> PermissionStatus;

    /// Resolve [`PermissionStatus::NotDetermined`] and return the resulting status.
    fn request_permission(&self) -> PermissionStatus {
        self.permission_status()
    }

    /// Write an encoded image. Fails with [`StickerError::PermissionDenied`] unless writes are
    /// allowed after requesting permission.
    fn export(&self, image_bytes: &[u8]) -> StickerResult<ExportReceipt>;
}

impl<T: ExportSink + ?Sized> ExportSink for std::sync::Arc<T> {
    fn permission_status(&self) -> PermissionStatus {
        (**self).permission_status()
    }

    fn request_permission(&self) -> PermissionStatus {
        (**self).request_permission()
    }

    fn export(&self, image_bytes: &[u8]) -> StickerResult<ExportReceipt> {
        (**self).export(image_bytes)
    }
}

/// [`ExportSink`] that drops JPEG files into a directory.
///
/// Starts out [`PermissionStatus::NotDetermined`]; the first request grants access when the
/// directory can be created.
#[derive(Debug)]
pub struct DirExportSink {
    dir: PathBuf,
    status: Mutex<PermissionStatus>,
}

impl DirExportSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_status(dir, PermissionStatus::NotDetermined)
    }

    /// Sink with a preset authorization state.
    pub fn with_status(dir: impl Into<PathBuf>, status: PermissionStatus) -> Self {
        Self {
            dir: dir.into(),
            status: Mutex::new(status),
        }
    }

    /// Destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PermissionStatus> {
        self.status
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ExportSink for DirExportSink {
    fn permission_status(&self) -> PermissionStatus {
        *self.lock()
    }

    fn request_permission(&self) -> PermissionStatus {
        let mut status = self.lock();
        if *status == PermissionStatus::NotDetermined {
            *status = match std::fs::create_dir_all(&self.dir) {
                Ok(()) => PermissionStatus::Authorized,
                Err(err) => {
                    tracing::warn!(dir = %self.dir.display(), error = %err, "export directory unavailable");
                    PermissionStatus::Denied
                }
            };
        }
        *status
    }

    #[tracing::instrument(skip(self, image_bytes), fields(dir = %self.dir.display(), bytes = image_bytes.len()))]
    fn export(&self, image_bytes: &[u8]) -> StickerResult<ExportReceipt> {
        let status = self.request_permission();
        if !status.allows_write() {
            return Err(StickerError::permission_denied(format!(
                "export to {} is {status:?}",
                self.dir.display()
            )));
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StickerError::export(format!("create {}: {e}", self.dir.display())))?;
        let name = format!(
            "sticker_{}_{}.jpg",
            current_timestamp_ms(),
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.dir.join(name);
        std::fs::write(&path, image_bytes)
            .map_err(|e| StickerError::export(format!("write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "image exported");
        Ok(ExportReceipt {
            location: path.display().to_string(),
            bytes_written: image_bytes.len(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/export.rs"]
mod tests;
