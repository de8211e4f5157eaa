//! Terrain generation error types.

use std::path::PathBuf;

use nebula_mesh::GridError;
use thiserror::Error;

/// Errors raised while generating terrain geometry.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// A produced grid violated the rectangular shape invariant.
    #[error("invalid terrain grid: {0}")]
    Grid(#[from] GridError),

    /// The heightmap image could not be opened or decoded.
    #[error("failed to load heightmap {path}: {source}")]
    HeightmapLoad {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}
