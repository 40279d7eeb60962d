//! Image catalog
//!
//! Images are decoded once at load time and kept in an
//! [`ImageCatalog`] under a unique tag. Tiles refer back to them by tag.

mod source;
mod surface;

pub use source::{DiskImageSource, ImageSource, MemoryImageSource};
pub use surface::PixelSurface;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AssetError, RegistryError};
use crate::registry::{Tagged, TaggedRegistry};

/// A loaded image
#[derive(Debug, Clone)]
pub struct Image {
    tag: String,
    filename: PathBuf,
    surface: PixelSurface,
}

impl Image {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// File the image was decoded from
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            tag: self.tag.clone(),
            filename: self.filename.display().to_string(),
            width: self.width(),
            height: self.height(),
        }
    }
}

impl Tagged for Image {
    fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image `{}` {}x{} from {}",
            self.tag,
            self.width(),
            self.height(),
            self.filename.display()
        )
    }
}

/// Serializable description of a loaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub tag: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// All loaded images, sorted by tag
pub type ImageCatalog = TaggedRegistry<Image>;

impl TaggedRegistry<Image> {
    /// Decode `path` and register it under `tag`
    pub fn load<S>(
        &mut self,
        source: &S,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<&Image, RegistryError>
    where
        S: ImageSource + ?Sized,
    {
        let path = path.as_ref();
        let result = self.create_with(tag, |tag| {
            if !source.exists(path) {
                return Err(AssetError::NotFound(path.to_path_buf()));
            }
            let surface = source.decode(path)?;
            Ok(Image {
                tag,
                filename: path.to_path_buf(),
                surface,
            })
        });

        if let Err(e) = &result {
            log::warn!("Unable to load image {}: {e}", path.display());
        }
        result
    }

    /// Load several `(path, tag)` pairs, skipping the ones that fail
    ///
    /// Returns how many images were registered.
    pub fn load_multiple<'a, S, P, I>(&mut self, source: &S, pairs: I) -> usize
    where
        S: ImageSource + ?Sized,
        P: AsRef<Path>,
        I: IntoIterator<Item = (P, &'a str)>,
    {
        let mut loaded = 0;
        for (path, tag) in pairs {
            if self.load(source, path, tag).is_ok() {
                loaded += 1;
            }
        }
        loaded
    }

    pub fn summaries(&self) -> Vec<ImageSummary> {
        self.iter().map(Image::summary).collect()
    }
}
