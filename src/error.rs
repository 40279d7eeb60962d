//! Error types for registries, assets and configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::tiles::Region;

/// Failure while building a record's payload
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{}: no such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("tile region {0} has zero area")]
    EmptyRegion(Region),

    #[error("tile region {region} lies outside {width}x{height} image `{image}`")]
    RegionOutOfBounds {
        image: String,
        region: Region,
        width: u32,
        height: u32,
    },
}

/// How a caller should treat a failed registry operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Registry is still consistent; report and carry on
    Recoverable,
    /// Caller broke the engine lifecycle; stop using this engine
    Fatal,
}

/// Errors from registry and engine operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tag must not be empty")]
    InvalidTag,

    #[error("tag `{0}` is not unique")]
    DuplicateTag(String),

    #[error("source image `{0}` is not loaded")]
    SourceNotFound(String),

    #[error("unable to build `{tag}`: {source}")]
    PayloadConstructionFailed {
        tag: String,
        #[source]
        source: AssetError,
    },

    /// Resizing the entry storage failed; after a failed removal the registry
    /// has been cleared.
    #[error("unable to resize registry holding {len} entries")]
    AllocationFailed { len: usize },

    #[error("engine has already been torn down")]
    UseAfterTeardown,
}

impl RegistryError {
    pub fn severity(&self) -> Severity {
        match self {
            RegistryError::UseAfterTeardown => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }
}

/// Settings or manifest files that could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine startup failures. Always fatal.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("unable to reserve {requested} {what} slots")]
    Allocation { what: &'static str, requested: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("a sprite needs at least one frame")]
    NoFrames,

    #[error("frame {0} has an empty tile tag")]
    EmptyFrame(usize),
}
