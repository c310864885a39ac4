use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{StickerError, StickerResult};

/// Resolves symbolic image names to decoded rasters.
///
/// Implementations must be shareable across threads: the compositor runs on a blocking worker
/// while the editor keeps resolving thumbnails for its panels.
pub trait AssetProvider: Send + Sync {
    /// Resolve `name` to a decoded image or fail with [`StickerError::AssetUnresolved`].
    fn resolve(&self, name: &str) -> StickerResult<Arc<PreparedImage>>;
}

impl<T: AssetProvider + ?Sized> AssetProvider for Arc<T> {
    fn resolve(&self, name: &str) -> StickerResult<Arc<PreparedImage>> {
        (**self).resolve(name)
    }
}

/// Normalize a symbolic asset name into a relative `/`-separated path.
pub fn normalize_rel_path(source: &str) -> StickerResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StickerError::validation("asset names must be relative"));
    }
    if s.is_empty() {
        return Err(StickerError::validation("asset name must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StickerError::validation("asset names must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StickerError::validation(
            "asset name must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// In-memory provider keyed by exact name.
#[derive(Debug, Default)]
pub struct MemoryAssetProvider {
    images: RwLock<HashMap<String, Arc<PreparedImage>>>,
}

impl MemoryAssetProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already decoded image under `name`, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, image: PreparedImage) {
        self.images
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(image));
    }

    /// Decode `bytes` and register the result under `name`.
    pub fn insert_encoded(&self, name: impl Into<String>, bytes: &[u8]) -> StickerResult<()> {
        let image = decode_image(bytes)?;
        self.insert(name, image);
        Ok(())
    }

    /// Remove an entry; returns `true` when something was removed.
    pub fn remove(&self, name: &str) -> bool {
        self.images
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Return `true` when no image is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn resolve(&self, name: &str) -> StickerResult<Arc<PreparedImage>> {
        self.images
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| StickerError::asset_unresolved(format!("'{name}' is not registered")))
    }
}

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Filesystem provider that searches a bundle-style asset tree.
///
/// For a name `n` the search order is `n`, `pager/n`, then for every theme directory `t` under
/// `stick/`: `stick/t/n` and `stick/t/stickers/n`. Names without an extension are tried with
/// `.png`, `.jpg` and `.jpeg`. Decoded images are cached for the provider's lifetime.
#[derive(Debug)]
pub struct DirAssetProvider {
    root: PathBuf,
    themes: Vec<String>,
    cache: RwLock<HashMap<String, Arc<PreparedImage>>>,
}

impl DirAssetProvider {
    /// Create a provider rooted at `root`, discovering theme directories under `root/stick`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let themes = discover_themes(&root.join("stick"));
        tracing::debug!(root = %root.display(), themes = themes.len(), "asset provider ready");
        Self {
            root,
            themes,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Root directory used for lookups.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Theme directory names discovered under `stick/`, sorted.
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Relative candidate paths probed for `norm`, in search order.
    pub fn candidates(&self, norm: &str) -> Vec<String> {
        let mut dirs = vec![String::new(), "pager/".to_string()];
        for t in &self.themes {
            dirs.push(format!("stick/{t}/"));
            dirs.push(format!("stick/{t}/stickers/"));
        }

        let has_ext = Path::new(norm)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

        let mut out = Vec::new();
        for d in &dirs {
            if has_ext {
                out.push(format!("{d}{norm}"));
            } else {
                for ext in IMAGE_EXTENSIONS {
                    out.push(format!("{d}{norm}.{ext}"));
                }
            }
        }
        out
    }

    fn load_uncached(&self, norm: &str) -> StickerResult<PreparedImage> {
        for rel in self.candidates(norm) {
            let p = self.root.join(Path::new(&rel));
            let Ok(bytes) = std::fs::read(&p) else {
                continue;
            };
            return decode_image(&bytes).map_err(|e| {
                StickerError::asset_unresolved(format!("failed to decode '{}': {e}", p.display()))
            });
        }
        Err(StickerError::asset_unresolved(format!(
            "'{norm}' not found under '{}'",
            self.root.display()
        )))
    }
}

impl AssetProvider for DirAssetProvider {
    fn resolve(&self, name: &str) -> StickerResult<Arc<PreparedImage>> {
        let norm = normalize_rel_path(name)
            .map_err(|e| StickerError::asset_unresolved(format!("'{name}': {e}")))?;

        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&norm)
            .cloned()
        {
            return Ok(hit);
        }

        let image = Arc::new(self.load_uncached(&norm)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(norm, Arc::clone(&image));
        Ok(image)
    }
}

fn discover_themes(stick_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(stick_dir) else {
        return Vec::new();
    };
    let mut out = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect::<Vec<_>>();
    out.sort();
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/provider.rs"]
mod tests;
