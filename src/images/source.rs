//! Where image payloads come from

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

use super::PixelSurface;

/// File lookup and decoding used when loading images
pub trait ImageSource {
    /// Whether `path` names an existing file
    fn exists(&self, path: &Path) -> bool;

    /// Decode `path` into a pixel surface
    fn decode(&self, path: &Path) -> Result<PixelSurface, AssetError>;
}

/// Reads and decodes image files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskImageSource;

impl ImageSource for DiskImageSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn decode(&self, path: &Path) -> Result<PixelSurface, AssetError> {
        let decoded = image::open(path).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(PixelSurface::from_image(decoded))
    }
}

/// Pre-decoded surfaces keyed by path, for headless tools and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryImageSource {
    surfaces: HashMap<PathBuf, PixelSurface>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, surface: PixelSurface) {
        self.surfaces.insert(path.into(), surface);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, path: impl Into<PathBuf>, surface: PixelSurface) -> Self {
        self.insert(path, surface);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn exists(&self, path: &Path) -> bool {
        self.surfaces.contains_key(path)
    }

    fn decode(&self, path: &Path) -> Result<PixelSurface, AssetError> {
        self.surfaces
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_path_buf()))
    }
}
