//! Asset manifests
//!
//! A JSON file listing the images to load and the tiles to cut from them:
//!
//! ```json
//! {
//!   "images": [{ "tag": "terrain", "file": "gfx/terrain.png" }],
//!   "tiles": [{ "tag": "grass", "image": "terrain", "x": 0, "y": 0, "width": 16, "height": 16 }],
//!   "sheets": [{ "image": "terrain", "tile_width": 16, "tile_height": 16, "prefix": "terrain" }]
//! }
//! ```

use std::path::{Path, PathBuf};

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tiles::Region;

/// An image to decode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDef {
    pub tag: String,
    /// Relative paths are resolved against the manifest's directory
    pub file: PathBuf,
}

/// A single tile cut from a loaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDef {
    pub tag: String,
    pub image: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TileDef {
    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.width, self.height)
    }
}

/// An image sliced into a grid of equally sized tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDef {
    pub image: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub prefix: String,
}

impl SheetDef {
    pub fn tile_size(&self) -> UVec2 {
        UVec2::new(self.tile_width, self.tile_height)
    }
}

/// Everything a game wants loaded at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub images: Vec<ImageDef>,
    pub tiles: Vec<TileDef>,
    pub sheets: Vec<SheetDef>,
}

impl AssetManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.tiles.is_empty() && self.sheets.is_empty()
    }
}

/// Outcome of applying a manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub images: usize,
    pub tiles: usize,
    /// Entries that were logged and skipped
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let manifest = AssetManifest::from_json_str(
            r#"{
                "images": [{ "tag": "terrain", "file": "gfx/terrain.png" }],
                "tiles": [{ "tag": "grass", "image": "terrain", "x": 16, "y": 0, "width": 16, "height": 8 }]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.images.len(), 1);
        assert_eq!(manifest.images[0].file, PathBuf::from("gfx/terrain.png"));
        assert_eq!(manifest.tiles[0].region(), Region::new(16, 0, 16, 8));
        assert!(manifest.sheets.is_empty());
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(AssetManifest::from_json_str("{}").unwrap().is_empty());
        assert!(matches!(
            AssetManifest::from_json_str(r#"{ "images": [{ "tag": "a" }] }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.json");
        std::fs::write(
            &path,
            r#"{ "sheets": [{ "image": "a", "tile_width": 8, "tile_height": 4, "prefix": "a" }] }"#,
        )
        .unwrap();

        let manifest = AssetManifest::load(&path).unwrap();
        assert_eq!(manifest.sheets[0].tile_size(), UVec2::new(8, 4));
        assert!(matches!(
            AssetManifest::load(&dir.path().join("nope.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
