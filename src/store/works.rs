use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::error::{StickerError, StickerResult};

const METADATA_FILE: &str = "metadata.json";

/// One saved work in the personal gallery.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkRecord {
    /// Unique id.
    pub id: uuid::Uuid,
    /// Full-size image file, relative to the store directory.
    pub file_name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Thumbnail file, when one was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_file_name: Option<String>,
}

/// Persistent gallery of saved composites.
pub trait WorkStore: Send + Sync {
    /// Persist `image` (and an optional `thumbnail`) as a new work.
    fn save(
        &self,
        image: &[u8],
        thumbnail: Option<&[u8]>,
        created_at_ms: u64,
    ) -> StickerResult<WorkRecord>;

    /// All works, newest first.
    fn list(&self) -> StickerResult<Vec<WorkRecord>>;

    /// Encoded bytes of a work. With `use_thumbnail` the thumbnail is preferred when present.
    fn load(&self, id: uuid::Uuid, use_thumbnail: bool) -> StickerResult<Vec<u8>>;

    /// Remove a work and its files.
    fn delete(&self, id: uuid::Uuid) -> StickerResult<()>;
}

impl<T: WorkStore + ?Sized> WorkStore for std::sync::Arc<T> {
    fn save(
        &self,
        image: &[u8],
        thumbnail: Option<&[u8]>,
        created_at_ms: u64,
    ) -> StickerResult<WorkRecord> {
        (**self).save(image, thumbnail, created_at_ms)
    }

    fn list(&self) -> StickerResult<Vec<WorkRecord>> {
        (**self).list()
    }

    fn load(&self, id: uuid::Uuid, use_thumbnail: bool) -> StickerResult<Vec<u8>> {
        (**self).load(id, use_thumbnail)
    }

    fn delete(&self, id: uuid::Uuid) -> StickerResult<()> {
        (**self).delete(id)
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// [`WorkStore`] backed by a directory of JPEG files plus a `metadata.json` index.
#[derive(Debug)]
pub struct FsWorkStore {
    dir: PathBuf,
    works: Mutex<Vec<WorkRecord>>,
}

impl FsWorkStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// A missing index starts empty. An unreadable or corrupt index is logged and also starts
    /// empty; it is overwritten by the next mutation.
    pub fn open(dir: impl Into<PathBuf>) -> StickerResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StickerError::store(format!("create {}: {e}", dir.display())))?;
        let works = load_metadata(&dir.join(METADATA_FILE));
        tracing::debug!(dir = %dir.display(), works = works.len(), "opened work store");
        Ok(Self {
            dir,
            works: Mutex::new(works),
        })
    }

    /// Store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a store file such as [`WorkRecord::file_name`].
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WorkRecord>> {
        self.works
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> StickerResult<()> {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)
            .map_err(|e| StickerError::store(format!("write {}: {e}", path.display())))
    }

    fn remove_files(&self, record: &WorkRecord) {
        for name in std::iter::once(&record.file_name).chain(record.thumbnail_file_name.as_ref()) {
            let path = self.dir.join(name);
            if let Err(err) = std::fs::remove_file(&path)
                && err.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove work file");
            }
        }
    }

    fn write_metadata(&self, works: &[WorkRecord]) -> StickerResult<()> {
        let json = serde_json::to_vec_pretty(works)
            .map_err(|e| StickerError::serde(format!("work metadata: {e}")))?;
        self.write_file(METADATA_FILE, &json)
    }
}

impl WorkStore for FsWorkStore {
    #[tracing::instrument(skip(self, image, thumbnail), fields(bytes = image.len()))]
    fn save(
        &self,
        image: &[u8],
        thumbnail: Option<&[u8]>,
        created_at_ms: u64,
    ) -> StickerResult<WorkRecord> {
        let id = uuid::Uuid::new_v4();
        let stem = format!("{created_at_ms}_{}", short_id(&id));
        let file_name = format!("work_{stem}.jpg");
        self.write_file(&file_name, image)?;

        let thumbnail_file_name = match thumbnail {
            Some(bytes) => {
                let name = format!("thumb_{stem}.jpg");
                if let Err(err) = self.write_file(&name, bytes) {
                    let _ = std::fs::remove_file(self.dir.join(&file_name));
                    return Err(err);
                }
                Some(name)
            }
            None => None,
        };

        let record = WorkRecord {
            id,
            file_name,
            created_at_ms,
            thumbnail_file_name,
        };

        let mut works = self.lock();
        let mut next = works.clone();
        let at = next
            .iter()
            .position(|w| w.created_at_ms <= created_at_ms)
            .unwrap_or(next.len());
        next.insert(at, record.clone());
        if let Err(err) = self.write_metadata(&next) {
            self.remove_files(&record);
            return Err(err);
        }
        *works = next;
        tracing::info!(id = %record.id, file = %record.file_name, "work saved");
        Ok(record)
    }

    fn list(&self) -> StickerResult<Vec<WorkRecord>> {
        Ok(self.lock().clone())
    }

    fn load(&self, id: uuid::Uuid, use_thumbnail: bool) -> StickerResult<Vec<u8>> {
        let record = self
            .lock()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| StickerError::work_not_found(id.to_string()))?;

        let name = match (&record.thumbnail_file_name, use_thumbnail) {
            (Some(thumb), true) => thumb.as_str(),
            _ => record.file_name.as_str(),
        };
        let path = self.dir.join(name);
        std::fs::read(&path).map_err(|e| StickerError::store(format!("read {}: {e}", path.display())))
    }

    fn delete(&self, id: uuid::Uuid) -> StickerResult<()> {
        let mut works = self.lock();
        let idx = works
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| StickerError::work_not_found(id.to_string()))?;
        let mut next = works.clone();
        let record = next.remove(idx);
        self.write_metadata(&next)?;
        *works = next;

        self.remove_files(&record);
        tracing::info!(%id, "work deleted");
        Ok(())
    }
}

fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn load_metadata(path: &Path) -> Vec<WorkRecord> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "work metadata unreadable, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice::<Vec<WorkRecord>>(&bytes) {
        Ok(mut works) => {
            works.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
            works
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "work metadata corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/works.rs"]
mod tests;
