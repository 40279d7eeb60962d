//! Engine context
//!
//! Owns the image and tile catalogs for one run of the game. Lifecycle:
//!
//! ```text
//! Engine::init ──► Initialized ──create──► Populated ──teardown──► TornDown
//! ```
//!
//! Every operation after teardown fails with
//! [`RegistryError::UseAfterTeardown`].

use std::path::Path;

use serde::Serialize;

use crate::error::{InitError, RegistryError};
use crate::images::{DiskImageSource, Image, ImageCatalog, ImageSource, ImageSummary, PixelSurface};
use crate::manifest::{AssetManifest, LoadReport};
use crate::registry::TaggedRegistry;
use crate::settings::Settings;
use crate::tiles::{Region, Tile, TileCatalog, TileSummary};

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Catalogs exist and are empty
    Initialized,
    /// At least one record has been created
    Populated,
    /// Catalogs released; the engine is unusable
    TornDown,
}

/// Serializable snapshot of both catalogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSummary {
    pub images: Vec<ImageSummary>,
    pub tiles: Vec<TileSummary>,
}

/// Process-wide asset state, passed explicitly to whoever needs it
pub struct Engine {
    settings: Settings,
    source: Box<dyn ImageSource + Send>,
    images: ImageCatalog,
    tiles: TileCatalog,
    phase: Phase,
}

impl Engine {
    /// Create empty catalogs, decoding images through `source`
    pub fn init(settings: Settings, source: impl ImageSource + Send + 'static) -> Result<Self, InitError> {
        let policy = settings.capacity_policy;
        let images = TaggedRegistry::with_capacity(policy, settings.image_capacity).map_err(|_| {
            InitError::Allocation {
                what: "image",
                requested: settings.image_capacity,
            }
        })?;
        let tiles = TaggedRegistry::with_capacity(policy, settings.tile_capacity).map_err(|_| {
            InitError::Allocation {
                what: "tile",
                requested: settings.tile_capacity,
            }
        })?;

        log::info!("Engine initialized ({} capacity policy)", policy.as_str());
        Ok(Self {
            settings,
            source: Box::new(source),
            images,
            tiles,
            phase: Phase::Initialized,
        })
    }

    /// Create an engine that decodes images from the local filesystem
    pub fn with_disk_source(settings: Settings) -> Result<Self, InitError> {
        Self::init(settings, DiskImageSource)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn ensure_live(&self) -> Result<(), RegistryError> {
        if self.phase == Phase::TornDown {
            return Err(RegistryError::UseAfterTeardown);
        }
        Ok(())
    }

    pub fn images(&self) -> Result<&ImageCatalog, RegistryError> {
        self.ensure_live()?;
        Ok(&self.images)
    }

    pub fn tiles(&self) -> Result<&TileCatalog, RegistryError> {
        self.ensure_live()?;
        Ok(&self.tiles)
    }

    pub fn find_image(&self, tag: &str) -> Result<Option<&Image>, RegistryError> {
        Ok(self.images()?.find(tag))
    }

    pub fn find_tile(&self, tag: &str) -> Result<Option<&Tile>, RegistryError> {
        Ok(self.tiles()?.find(tag))
    }

    /// Decode `path` and register it as image `tag`
    pub fn load_image(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<&Image, RegistryError> {
        self.ensure_live()?;
        let image = self.images.load(self.source.as_ref(), path, tag)?;
        self.phase = Phase::Populated;
        Ok(image)
    }

    /// Load several `(path, tag)` pairs, skipping failures
    pub fn load_images<'a, P, I>(&mut self, pairs: I) -> Result<usize, RegistryError>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (P, &'a str)>,
    {
        self.ensure_live()?;
        let loaded = self.images.load_multiple(self.source.as_ref(), pairs);
        if loaded > 0 {
            self.phase = Phase::Populated;
        }
        Ok(loaded)
    }

    /// Register the `region` of image `image_tag` as tile `tag`
    pub fn create_tile(&mut self, image_tag: &str, region: Region, tag: &str) -> Result<&Tile, RegistryError> {
        self.ensure_live()?;
        let tile = self.tiles.create(&self.images, image_tag, region, tag)?;
        self.phase = Phase::Populated;
        Ok(tile)
    }

    /// Cut image `image_tag` into a grid of tiles; see
    /// [`TileCatalog::slice_sheet`]
    pub fn slice_sheet(
        &mut self,
        image_tag: &str,
        tile_size: glam::UVec2,
        prefix: &str,
    ) -> Result<usize, RegistryError> {
        self.ensure_live()?;
        let added = self.tiles.slice_sheet(&self.images, image_tag, tile_size, prefix)?;
        if added > 0 {
            self.phase = Phase::Populated;
        }
        Ok(added)
    }

    /// Remove image `tag`. Tiles cut from it stay registered but no longer
    /// resolve.
    pub fn remove_image(&mut self, tag: &str) -> Result<bool, RegistryError> {
        self.ensure_live()?;
        let dependents = self.tiles.cut_from(tag).count();
        let removed = self.images.remove(tag)?;
        if removed && dependents > 0 {
            log::warn!("Removed image `{tag}` still used by {dependents} tiles");
        }
        Ok(removed)
    }

    pub fn remove_tile(&mut self, tag: &str) -> Result<bool, RegistryError> {
        self.ensure_live()?;
        self.tiles.remove(tag)
    }

    /// Pixels of tile `tag`, if both the tile and its image are loaded
    pub fn tile_pixels(&self, tag: &str) -> Result<Option<PixelSurface>, RegistryError> {
        self.ensure_live()?;
        Ok(self
            .tiles
            .find(tag)
            .and_then(|tile| tile.extract(&self.images)))
    }

    /// Tiles whose source image has been removed
    pub fn orphaned_tiles(&self) -> Result<Vec<&Tile>, RegistryError> {
        self.ensure_live()?;
        Ok(self
            .tiles
            .iter()
            .filter(|tile| !self.images.contains(tile.image_tag()))
            .collect())
    }

    /// Load everything listed in `manifest`
    ///
    /// Images come first so tiles can refer to them. Entries that fail are
    /// logged and counted in [`LoadReport::failed`]; only a torn-down engine
    /// is an error.
    pub fn apply_manifest(&mut self, manifest: &AssetManifest, base_dir: &Path) -> Result<LoadReport, RegistryError> {
        self.ensure_live()?;
        let mut report = LoadReport::default();

        for def in &manifest.images {
            let path = base_dir.join(&def.file);
            match self.load_image(&path, &def.tag) {
                Ok(_) => report.images += 1,
                Err(_) => report.failed += 1,
            }
        }

        for def in &manifest.tiles {
            match self.create_tile(&def.image, def.region(), &def.tag) {
                Ok(_) => report.tiles += 1,
                Err(_) => report.failed += 1,
            }
        }

        for def in &manifest.sheets {
            match self.slice_sheet(&def.image, def.tile_size(), &def.prefix) {
                Ok(added) => report.tiles += added,
                Err(e) => {
                    log::warn!("Skipping sheet `{}`: {e}", def.prefix);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "Loaded {} images and {} tiles ({} failed)",
            report.images,
            report.tiles,
            report.failed
        );
        Ok(report)
    }

    pub fn summary(&self) -> Result<EngineSummary, RegistryError> {
        self.ensure_live()?;
        Ok(EngineSummary {
            images: self.images.summaries(),
            tiles: self.tiles.summaries(),
        })
    }

    /// Release every tile and image. Valid exactly once.
    pub fn teardown(&mut self) -> Result<(), RegistryError> {
        self.ensure_live()?;
        self.release();
        log::info!("Engine torn down");
        Ok(())
    }

    fn release(&mut self) {
        // Tiles refer to images, so they go first
        self.tiles.clear();
        self.images.clear();
        self.phase = Phase::TornDown;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.phase != Phase::TornDown {
            log::debug!("Engine dropped without teardown, releasing catalogs");
            self.release();
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("phase", &self.phase)
            .field("images", &self.images.len())
            .field("tiles", &self.tiles.len())
            .finish()
    }
}
