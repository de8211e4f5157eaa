//! Frame capture: a [`RenderSurface`] that records draw commands instead of
//! issuing them, for headless runs and tests.

use nebula_mesh::{GridMesh, SurfaceGrid};

use crate::{ParticleSprite, RenderSurface};

/// A single recorded draw command.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    /// A triangulated grid surface.
    Mesh {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        columns: usize,
        /// Upload-ready mesh built from the grid.
        mesh: GridMesh,
    },
    /// A particle billboard.
    Particle(ParticleSprite),
}

/// Aggregate counts for one captured frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of mesh draw commands.
    pub meshes: usize,
    /// Total triangles across all meshes.
    pub triangles: usize,
    /// Number of particle draw commands.
    pub particles: usize,
}

/// Records draw commands in submission order.
#[derive(Debug, Default)]
pub struct FrameCapture {
    commands: Vec<DrawCommand>,
}

impl FrameCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded particle sprites in submission order.
    pub fn particles(&self) -> impl Iterator<Item = &ParticleSprite> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Particle(sprite) => Some(sprite),
            DrawCommand::Mesh { .. } => None,
        })
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count meshes, triangles and particles in the current frame.
    pub fn stats(&self) -> FrameStats {
        self.commands
            .iter()
            .fold(FrameStats::default(), |mut stats, cmd| {
                match cmd {
                    DrawCommand::Mesh { mesh, .. } => {
                        stats.meshes += 1;
                        stats.triangles += mesh.triangle_count();
                    }
                    DrawCommand::Particle(_) => stats.particles += 1,
                }
                stats
            })
    }

    /// Clear for reuse next frame, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for FrameCapture {
    fn draw_grid(&mut self, grid: &SurfaceGrid) {
        if grid.is_empty() {
            log::trace!("skipping empty grid draw");
            return;
        }
        self.commands.push(DrawCommand::Mesh {
            rows: grid.length(),
            columns: grid.width(),
            mesh: GridMesh::from_grid(grid),
        });
    }

    fn draw_particle(&mut self, sprite: &ParticleSprite) {
        self.commands.push(DrawCommand::Particle(*sprite));
    }
}
