//! Renderer-facing contract: the narrow `render(surface)` hand-off used by
//! geometry generators and particle systems, plus a recording surface.
//!
//! The concrete graphics context stays behind [`RenderSurface`]; producers
//! pass read-only geometric and visual data and expect nothing back.

pub mod capture;

pub use capture::{DrawCommand, FrameCapture, FrameStats};

use glam::Vec3;
use nebula_mesh::SurfaceGrid;

/// Visual state of one particle handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSprite {
    /// World-space position.
    pub position: Vec3,
    /// Linear RGBA color.
    pub color: [f32; 4],
    /// Billboard size in world units.
    pub size: f32,
}

/// A graphics context able to draw generated surfaces and particles.
///
/// Implementations must not feed anything back into the producer; every
/// argument is a read-only snapshot valid for the duration of the call.
pub trait RenderSurface {
    /// Draw a grid surface as a triangulated mesh.
    fn draw_grid(&mut self, grid: &SurfaceGrid);

    /// Draw a single particle billboard.
    fn draw_particle(&mut self, sprite: &ParticleSprite);
}
