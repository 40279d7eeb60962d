//! Ainur - image and tile catalogs for 2D games
//!
//! Core modules:
//! - `registry`: Sorted, tag-keyed storage shared by both catalogs
//! - `images`: Decoded images and where they come from
//! - `tiles`: Rectangular regions cut from images
//! - `sprite`: Animation frames built from tiles
//! - `manifest`: JSON asset lists applied at startup
//! - `engine`: Lifecycle context owning both catalogs

pub mod engine;
pub mod error;
pub mod images;
pub mod manifest;
pub mod registry;
pub mod settings;
pub mod sprite;
pub mod tiles;

pub use engine::{Engine, EngineSummary, Phase};
pub use error::{AssetError, ConfigError, InitError, RegistryError, Severity, SpriteError};
pub use images::{DiskImageSource, Image, ImageCatalog, ImageSource, MemoryImageSource, PixelSurface};
pub use manifest::{AssetManifest, LoadReport};
pub use registry::{Tagged, TaggedRegistry};
pub use settings::{CapacityPolicy, Settings};
pub use sprite::Sprite;
pub use tiles::{Region, Tile, TileCatalog};

/// Engine-wide constants
pub mod consts {
    /// Frames kept per sprite; extra frames are dropped
    pub const MAX_SPRITE_FRAMES: usize = 32;
    /// Settings file looked up next to the working directory
    pub const DEFAULT_SETTINGS_FILE: &str = "ainur.json";
}
