//! Engine settings
//!
//! Loaded from a JSON file next to the game's assets. Every field has a
//! default so a partial (or missing) file still yields usable settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a registry sizes its entry storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Grow by one slot per insert, shrink to fit after each removal
    #[default]
    Exact,
    /// Let the vector grow geometrically and never shrink
    Amortized,
}

impl CapacityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityPolicy::Exact => "exact",
            CapacityPolicy::Amortized => "amortized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exact" | "fit" => Some(CapacityPolicy::Exact),
            "amortized" | "amortised" => Some(CapacityPolicy::Amortized),
            _ => None,
        }
    }

    /// Whether storage is shrunk back to the entry count after a removal
    pub fn shrinks(&self) -> bool {
        matches!(self, CapacityPolicy::Exact)
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage policy shared by both registries
    pub capacity_policy: CapacityPolicy,
    /// Image slots reserved at startup
    pub image_capacity: usize,
    /// Tile slots reserved at startup
    pub tile_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity_policy: CapacityPolicy::Exact,
            image_capacity: 0,
            tile_capacity: 0,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Read settings from a JSON file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}
