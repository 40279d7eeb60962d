//! Rectangular regions on an image

use std::fmt;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// A sub-rectangle of an image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Top-left corner
    pub origin: IVec2,
    /// Width and height
    pub size: UVec2,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn area(&self) -> u64 {
        u64::from(self.size.x) * u64::from(self.size.y)
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Whether the region lies entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        // i64 so that origin + size cannot overflow
        let (x, y) = (i64::from(self.origin.x), i64::from(self.origin.y));
        x >= 0
            && y >= 0
            && x + i64::from(self.size.x) <= i64::from(width)
            && y + i64::from(self.size.y) <= i64::from(height)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.size.x, self.size.y, self.origin.x, self.origin.y
        )
    }
}
