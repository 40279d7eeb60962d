//! Decoded pixel data

use std::fmt;

use image::{DynamicImage, RgbaImage};

use crate::tiles::Region;

/// An owned RGBA8 pixel buffer in the engine's native layout
#[derive(Clone, PartialEq)]
pub struct PixelSurface {
    pixels: RgbaImage,
}

impl PixelSurface {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Wrap raw RGBA bytes; `None` if the buffer is the wrong size
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(|pixels| Self { pixels })
    }

    /// Convert any decoded image to RGBA8
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            pixels: image.into_rgba8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Copy out a sub-rectangle; `None` if it does not fit
    pub fn crop(&self, region: Region) -> Option<PixelSurface> {
        if region.is_empty() || !region.fits_within(self.width(), self.height()) {
            return None;
        }
        // fits_within guarantees a non-negative origin
        let view = image::imageops::crop_imm(
            &self.pixels,
            region.x() as u32,
            region.y() as u32,
            region.width(),
            region.height(),
        );
        Some(Self {
            pixels: view.to_image(),
        })
    }
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
