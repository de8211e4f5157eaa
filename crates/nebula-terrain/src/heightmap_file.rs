//! Heightmap-image terrain generator.

use std::path::{Path, PathBuf};

use glam::DVec3;
use image::{ImageBuffer, Luma};
use nebula_mesh::{GridError, SurfaceGrid};

use crate::error::TerrainError;
use crate::generator::{GenerationParams, GeometryGenerator};

/// 16-bit grayscale heightmap.
pub type HeightImage = ImageBuffer<Luma<u16>, Vec<u16>>;

enum HeightmapSource {
    File(PathBuf),
    Image(HeightImage),
}

/// Builds terrain from a grayscale image, black = 0 and white = `height_scale`.
///
/// `params.rows` / `params.columns` of 0 keep the image's native height /
/// width; other values resample with nearest-neighbour lookup. File sources
/// are re-read on every generation so edits to the image are picked up.
/// `params.seed` is unused.
pub struct HeightmapFileGenerator {
    source: HeightmapSource,
    grid: SurfaceGrid,
}

impl HeightmapFileGenerator {
    /// Generator reading the image at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: HeightmapSource::File(path.into()),
            grid: SurfaceGrid::empty(),
        }
    }

    /// Generator reading an in-memory image.
    pub fn from_image(image: HeightImage) -> Self {
        Self {
            source: HeightmapSource::Image(image),
            grid: SurfaceGrid::empty(),
        }
    }

    /// Generator reading raw row-major 16-bit samples.
    ///
    /// Fails if `samples.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, samples: Vec<u16>) -> Result<Self, TerrainError> {
        let points = samples.len();
        let image = HeightImage::from_raw(width, height, samples).ok_or(
            GridError::DimensionMismatch {
                rows: height as usize,
                columns: width as usize,
                points,
            },
        )?;
        Ok(Self::from_image(image))
    }

    fn load(path: &Path) -> Result<HeightImage, TerrainError> {
        let image = image::open(path).map_err(|source| TerrainError::HeightmapLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(image.to_luma16())
    }
}

/// Nearest source index for `index` when resampling `src_len` onto `dst_len`.
fn nearest(index: usize, dst_len: usize, src_len: usize) -> u32 {
    ((index * src_len) / dst_len).min(src_len - 1) as u32
}

fn grid_from_image(image: &HeightImage, params: &GenerationParams) -> SurfaceGrid {
    let (img_w, img_h) = (image.width() as usize, image.height() as usize);
    if img_w == 0 || img_h == 0 {
        return SurfaceGrid::empty();
    }
    let rows = if params.rows == 0 { img_h } else { params.rows };
    let columns = if params.columns == 0 { img_w } else { params.columns };

    SurfaceGrid::from_fn(rows, columns, |r, c| {
        let Luma([value]) = *image.get_pixel(nearest(c, columns, img_w), nearest(r, rows, img_h));
        let height = f64::from(value) * params.height_scale / f64::from(u16::MAX);
        DVec3::new(
            c as f64 * params.spacing,
            height,
            r as f64 * params.spacing,
        )
    })
}

impl GeometryGenerator for HeightmapFileGenerator {
    fn generate_geometry(&mut self, params: &GenerationParams) -> Result<(), TerrainError> {
        let grid = match &self.source {
            HeightmapSource::File(path) => {
                let image = Self::load(path)?;
                log::debug!(
                    "loaded {}x{} heightmap from {}",
                    image.width(),
                    image.height(),
                    path.display()
                );
                grid_from_image(&image, params)
            }
            HeightmapSource::Image(image) => grid_from_image(image, params),
        };
        self.grid = grid;
        Ok(())
    }

    fn surface(&self) -> &SurfaceGrid {
        &self.grid
    }
}
