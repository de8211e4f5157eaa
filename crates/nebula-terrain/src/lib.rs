//! Procedural terrain: turbulence noise, heightfield construction, and the
//! interchangeable geometry generators (noise, heightmap image, maze).

mod error;
mod generator;
mod heightfield;
mod heightmap_file;
mod maze;
mod noise_engine;
mod noise_terrain;

pub use error::TerrainError;
pub use generator::{GenerationParams, GeometryGenerator};
pub use heightfield::{HeightfieldBuilder, HeightfieldParams};
pub use heightmap_file::{HeightImage, HeightmapFileGenerator};
pub use maze::{MazeGenerator, MazeLayout, carve_maze};
pub use noise_engine::NoiseEngine;
pub use noise_terrain::NoiseTerrainGenerator;
