//! Tile catalog
//!
//! A tile is a rectangle cut from a loaded image. It stores the image's tag
//! rather than the image itself, so a tile outlives its image gracefully:
//! once the image is removed, [`Tile::source`] simply returns `None`.

mod region;

pub use region::Region;

use std::fmt;

use glam::{IVec2, UVec2};
use serde::Serialize;

use crate::error::{AssetError, RegistryError};
use crate::images::{Image, ImageCatalog, PixelSurface};
use crate::registry::{Tagged, TaggedRegistry};

/// A region of a source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    tag: String,
    image: String,
    region: Region,
}

impl Tile {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag of the image this tile was cut from
    pub fn image_tag(&self) -> &str {
        &self.image
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Resolve the source image, if it is still loaded
    pub fn source<'a>(&self, images: &'a ImageCatalog) -> Option<&'a Image> {
        images.find(&self.image)
    }

    /// Copy the tile's pixels out of its source image
    pub fn extract(&self, images: &ImageCatalog) -> Option<PixelSurface> {
        self.source(images)?.surface().crop(self.region)
    }

    pub fn summary(&self) -> TileSummary {
        TileSummary {
            tag: self.tag.clone(),
            image: self.image.clone(),
            x: self.region.x(),
            y: self.region.y(),
            width: self.region.width(),
            height: self.region.height(),
        }
    }

    fn cut(image: &Image, tag: String, region: Region) -> Result<Self, AssetError> {
        if region.is_empty() {
            return Err(AssetError::EmptyRegion(region));
        }
        if !region.fits_within(image.width(), image.height()) {
            return Err(AssetError::RegionOutOfBounds {
                image: image.tag().to_owned(),
                region,
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            tag,
            image: image.tag().to_owned(),
            region,
        })
    }
}

impl Tagged for Tile {
    fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile `{}` {} of `{}`", self.tag, self.region, self.image)
    }
}

/// Serializable description of a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileSummary {
    pub tag: String,
    pub image: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// All registered tiles, sorted by tag
pub type TileCatalog = TaggedRegistry<Tile>;

impl TaggedRegistry<Tile> {
    /// Register the `region` of image `image_tag` as tile `tag`
    pub fn create(
        &mut self,
        images: &ImageCatalog,
        image_tag: &str,
        region: Region,
        tag: &str,
    ) -> Result<&Tile, RegistryError> {
        let result = if tag.is_empty() {
            Err(RegistryError::InvalidTag)
        } else if let Some(image) = images.find(image_tag) {
            self.create_with(tag, |tag| Tile::cut(image, tag, region))
        } else {
            Err(RegistryError::SourceNotFound(image_tag.to_owned()))
        };
        if let Err(e) = &result {
            log::warn!("Unable to create tile `{tag}`: {e}");
        }
        result
    }

    /// Cut an image into a grid of `tile_size` tiles tagged
    /// `{prefix}_{row}_{col}`
    ///
    /// Cells that would run past the right or bottom edge are skipped. Either
    /// every cell is registered or none is. Returns the number of tiles added.
    pub fn slice_sheet(
        &mut self,
        images: &ImageCatalog,
        image_tag: &str,
        tile_size: UVec2,
        prefix: &str,
    ) -> Result<usize, RegistryError> {
        if prefix.is_empty() {
            return Err(RegistryError::InvalidTag);
        }
        let Some(image) = images.find(image_tag) else {
            log::warn!("Unable to slice `{image_tag}`: image not found");
            return Err(RegistryError::SourceNotFound(image_tag.to_owned()));
        };
        if tile_size.x == 0 || tile_size.y == 0 {
            return Err(RegistryError::PayloadConstructionFailed {
                tag: prefix.to_owned(),
                source: AssetError::EmptyRegion(Region {
                    origin: IVec2::ZERO,
                    size: tile_size,
                }),
            });
        }

        let columns = image.width() / tile_size.x;
        let rows = image.height() / tile_size.y;
        let mut cells = Vec::new();
        for row in 0..rows {
            for col in 0..columns {
                let origin = IVec2::new(
                    i32::try_from(col * tile_size.x).unwrap_or(i32::MAX),
                    i32::try_from(row * tile_size.y).unwrap_or(i32::MAX),
                );
                let region = Region {
                    origin,
                    size: tile_size,
                };
                cells.push((format!("{prefix}_{row}_{col}"), region));
            }
        }

        for (tag, _) in &cells {
            self.vacant_slot(tag)?;
        }
        self.reserve(cells.len())?;

        for (tag, region) in &cells {
            self.create_with(tag, |tag| Tile::cut(image, tag, *region))?;
        }

        log::debug!(
            "sliced `{image_tag}` into {rows}x{columns} tiles of {}x{}",
            tile_size.x,
            tile_size.y
        );
        Ok(cells.len())
    }

    /// Tiles cut from `image_tag`
    pub fn cut_from<'a>(&'a self, image_tag: &'a str) -> impl Iterator<Item = &'a Tile> {
        self.iter().filter(move |tile| tile.image == image_tag)
    }

    pub fn summaries(&self) -> Vec<TileSummary> {
        self.iter().map(Tile::summary).collect()
    }
}
