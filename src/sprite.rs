//! Sprites: animation frames built from registered tiles

use crate::consts::MAX_SPRITE_FRAMES;
use crate::error::SpriteError;
use crate::tiles::{Tile, TileCatalog};

/// An ordered list of tile tags played back as animation frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    frames: Vec<String>,
}

impl Sprite {
    /// Build a sprite from tile tags
    ///
    /// Frames past [`MAX_SPRITE_FRAMES`] are dropped with a warning.
    pub fn new<I, S>(frames: I) -> Result<Self, SpriteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(SpriteError::NoFrames);
        }
        if let Some(index) = frames.iter().position(String::is_empty) {
            return Err(SpriteError::EmptyFrame(index));
        }
        if frames.len() > MAX_SPRITE_FRAMES {
            log::warn!(
                "Sprite has {} frames, keeping the first {}",
                frames.len(),
                MAX_SPRITE_FRAMES
            );
            frames.truncate(MAX_SPRITE_FRAMES);
        }
        Ok(Self { frames })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    /// Tile tag shown at animation `step`, wrapping around
    pub fn frame_at(&self, step: usize) -> &str {
        &self.frames[step % self.frames.len()]
    }

    /// Look up the tile shown at `step`
    pub fn resolve<'a>(&self, step: usize, tiles: &'a TileCatalog) -> Option<&'a Tile> {
        tiles.find(self.frame_at(step))
    }

    /// Frames whose tile is not registered
    pub fn missing_frames<'a>(&'a self, tiles: &'a TileCatalog) -> impl Iterator<Item = &'a str> {
        self.frames().filter(move |tag| !tiles.contains(tag))
    }
}
