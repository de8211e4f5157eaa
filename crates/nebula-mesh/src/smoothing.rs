//! Surface smoothing and refinement over [`SurfaceGrid`]s.
//!
//! Two smoothers share the [`SurfaceSmoother`] contract, each with its own
//! explicitly named strength parameter:
//!
//! - [`RelaxationSmoother`]: `iterations` passes of neighbour averaging.
//! - [`SubdivisionSmoother`]: `subdivisions` interpolated points inserted
//!   between every pair of neighbouring points.
//!
//! Non-positive strengths are a no-op: the output equals the input.

use glam::DVec3;

use crate::grid::SurfaceGrid;

/// Produces a smoothed or refined surface from an input grid.
pub trait SurfaceSmoother {
    /// Replace the owned output surface with a smoothed version of `input`.
    fn generate_surface(&mut self, input: &SurfaceGrid);

    /// The last generated surface; empty before the first call.
    fn surface(&self) -> &SurfaceGrid;
}

/// How relaxation treats points on the outer edge of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Edge points keep their elevation; only interior points move.
    #[default]
    Fixed,
    /// Edge points are smoothed too, reading neighbours reflected across the edge.
    Mirrored,
}

/// Parameters for [`RelaxationSmoother`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationParams {
    /// Number of averaging passes. Values <= 0 leave the surface unchanged.
    pub iterations: i32,
    /// Blend toward the neighbour mean per pass, in `[0, 1]`. Default: 0.5.
    pub weight: f64,
    /// Edge handling.
    pub boundary: BoundaryPolicy,
}

impl Default for RelaxationParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            weight: 0.5,
            boundary: BoundaryPolicy::Fixed,
        }
    }
}

/// Iterative Laplacian relaxation of grid elevations.
///
/// Each pass computes, for every affected point,
/// `y' = (1 - w) * y + w * mean(y_left, y_right, y_up, y_down)` from the
/// previous pass's values. Only the Y component changes.
#[derive(Debug, Default)]
pub struct RelaxationSmoother {
    params: RelaxationParams,
    surface: SurfaceGrid,
}

impl RelaxationSmoother {
    /// Create a smoother with the given parameters.
    pub fn new(params: RelaxationParams) -> Self {
        Self {
            params,
            surface: SurfaceGrid::empty(),
        }
    }

    /// The configured parameters.
    pub fn params(&self) -> &RelaxationParams {
        &self.params
    }

    fn relax_once(&self, grid: &SurfaceGrid) -> SurfaceGrid {
        let rows = grid.length();
        let columns = grid.width();
        let w = self.params.weight.clamp(0.0, 1.0);
        let points = grid.points();
        let height = |r: usize, c: usize| points[r * columns + c].y;

        grid.map_heights(|r, c, p| {
            let on_edge = r == 0 || c == 0 || r + 1 == rows || c + 1 == columns;
            if on_edge && self.params.boundary == BoundaryPolicy::Fixed {
                return p.y;
            }
            let left = height(r, mirror(c as isize - 1, columns));
            let right = height(r, mirror(c as isize + 1, columns));
            let up = height(mirror(r as isize - 1, rows), c);
            let down = height(mirror(r as isize + 1, rows), c);
            let mean = (left + right + up + down) * 0.25;
            (1.0 - w) * p.y + w * mean
        })
    }
}

/// Reflect an index across the grid edge: -1 maps to 1 and `len` to `len - 2`.
///
/// Axes of length 1 reflect onto index 0.
fn mirror(index: isize, len: usize) -> usize {
    let last = len as isize - 1;
    let reflected = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    reflected.clamp(0, last.max(0)) as usize
}

impl SurfaceSmoother for RelaxationSmoother {
    fn generate_surface(&mut self, input: &SurfaceGrid) {
        let mut current = input.clone();
        for _ in 0..self.params.iterations.max(0) {
            current = self.relax_once(&current);
        }
        log::debug!(
            "relaxed {}x{} surface over {} passes",
            current.length(),
            current.width(),
            self.params.iterations.max(0)
        );
        self.surface = current;
    }

    fn surface(&self) -> &SurfaceGrid {
        &self.surface
    }
}

/// Most points inserted per segment; larger requests are clamped to this.
pub const MAX_SUBDIVISIONS: i32 = 64;

/// Bilinear refinement: inserts `subdivisions` interpolated points between
/// each pair of neighbouring points along both axes.
///
/// An axis of `n` points becomes `(n - 1) * (subdivisions + 1) + 1` points,
/// with `subdivisions` clamped to [`MAX_SUBDIVISIONS`].
/// Original points are preserved at their original positions.
#[derive(Debug, Default)]
pub struct SubdivisionSmoother {
    subdivisions: i32,
    surface: SurfaceGrid,
}

impl SubdivisionSmoother {
    /// Create a smoother inserting `subdivisions` points per segment.
    pub fn new(subdivisions: i32) -> Self {
        Self {
            subdivisions,
            surface: SurfaceGrid::empty(),
        }
    }

    /// The configured subdivision count.
    pub fn subdivisions(&self) -> i32 {
        self.subdivisions
    }
}

/// Output length of one axis after subdivision.
fn refined_len(len: usize, steps: usize) -> usize {
    if len == 0 { 0 } else { (len - 1) * steps + 1 }
}

/// Split a refined index into the source segment start and the fraction along it.
fn locate(index: usize, steps: usize, len: usize) -> (usize, f64) {
    let segment = index / steps;
    if segment + 1 >= len {
        return (len - 1, 0.0);
    }
    (segment, (index % steps) as f64 / steps as f64)
}

impl SurfaceSmoother for SubdivisionSmoother {
    fn generate_surface(&mut self, input: &SurfaceGrid) {
        if self.subdivisions <= 0 || input.is_empty() {
            self.surface = input.clone();
            return;
        }
        let steps = self.subdivisions.min(MAX_SUBDIVISIONS) as usize + 1;
        let rows = input.length();
        let columns = input.width();
        let at = |r: usize, c: usize| input.points()[r * columns + c];

        let refined = SurfaceGrid::from_fn(
            refined_len(rows, steps),
            refined_len(columns, steps),
            |r, c| {
                let (r0, tr) = locate(r, steps, rows);
                let (c0, tc) = locate(c, steps, columns);
                let r1 = (r0 + 1).min(rows - 1);
                let c1 = (c0 + 1).min(columns - 1);
                let top = DVec3::lerp(at(r0, c0), at(r0, c1), tc);
                let bottom = DVec3::lerp(at(r1, c0), at(r1, c1), tc);
                top.lerp(bottom, tr)
            },
        );
        log::debug!(
            "subdivided {}x{} surface into {}x{}",
            rows,
            columns,
            refined.length(),
            refined.width()
        );
        self.surface = refined;
    }

    fn surface(&self) -> &SurfaceGrid {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    /// 5x5 flat grid with a single spike in the middle.
    fn spike() -> SurfaceGrid {
        SurfaceGrid::from_fn(5, 5, |r, c| {
            let y = if r == 2 && c == 2 { 8.0 } else { 0.0 };
            DVec3::new(c as f64, y, r as f64)
        })
    }

    /// 3x3 grid whose only non-zero elevation is the corner (0, 0).
    fn corner_bump() -> SurfaceGrid {
        SurfaceGrid::from_fn(3, 3, |r, c| {
            let y = if r == 0 && c == 0 { 4.0 } else { 0.0 };
            DVec3::new(c as f64, y, r as f64)
        })
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let input = spike();
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: 0,
            ..Default::default()
        });
        smoother.generate_surface(&input);
        assert_eq!(smoother.surface(), &input);
    }

    #[test]
    fn test_negative_iterations_is_identity() {
        let input = spike();
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: -3,
            ..Default::default()
        });
        smoother.generate_surface(&input);
        assert_eq!(smoother.surface(), &input);
    }

    #[test]
    fn test_surface_empty_before_generation() {
        let smoother = RelaxationSmoother::new(RelaxationParams::default());
        assert!(smoother.surface().is_empty());
    }

    #[test]
    fn test_single_pass_spreads_spike() {
        let mut smoother = RelaxationSmoother::new(RelaxationParams::default());
        smoother.generate_surface(&spike());
        let out = smoother.surface();

        // Centre: 0.5 * 8 + 0.5 * 0 = 4. Neighbours: 0.5 * (8 / 4) = 1.
        assert!((out.get(2, 2).unwrap().y - 4.0).abs() < EPSILON);
        assert!((out.get(1, 2).unwrap().y - 1.0).abs() < EPSILON);
        assert!((out.get(2, 3).unwrap().y - 1.0).abs() < EPSILON);
        assert!(out.get(1, 1).unwrap().y.abs() < EPSILON);
    }

    #[test]
    fn test_relaxation_preserves_planar_coordinates() {
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: 4,
            ..Default::default()
        });
        let input = spike();
        smoother.generate_surface(&input);
        for (a, b) in input.points().iter().zip(smoother.surface().points()) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.z, b.z);
        }
    }

    #[test]
    fn test_fixed_boundary_holds_edges() {
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: 5,
            boundary: BoundaryPolicy::Fixed,
            ..Default::default()
        });
        smoother.generate_surface(&corner_bump());
        let out = smoother.surface();
        assert_eq!(out.get(0, 0).unwrap().y, 4.0);
        assert_eq!(out.get(0, 1).unwrap().y, 0.0);
        // The single interior point reads two zero edge neighbours only.
        assert_eq!(out.get(1, 1).unwrap().y, 0.0);
    }

    #[test]
    fn test_mirrored_boundary_smooths_edges() {
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: 1,
            boundary: BoundaryPolicy::Mirrored,
            ..Default::default()
        });
        smoother.generate_surface(&corner_bump());
        let out = smoother.surface();
        // Corner neighbours mirror onto (0, 1) and (1, 0), both zero.
        assert!((out.get(0, 0).unwrap().y - 2.0).abs() < EPSILON);
        // Edge point (0, 1): left = 4, right = 0, up mirrors to (1, 1) = 0, down = 0.
        assert!((out.get(0, 1).unwrap().y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_mirrored_single_row_is_stable() {
        let input = SurfaceGrid::from_fn(1, 3, |_, c| DVec3::new(c as f64, c as f64, 0.0));
        let mut smoother = RelaxationSmoother::new(RelaxationParams {
            iterations: 1,
            weight: 1.0,
            boundary: BoundaryPolicy::Mirrored,
        });
        smoother.generate_surface(&input);
        // Middle: (0 + 2 + 1 + 1) / 4, vertical neighbours reflect onto itself.
        assert!((smoother.surface().get(0, 1).unwrap().y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_subdivisions_is_identity() {
        let input = spike();
        let mut smoother = SubdivisionSmoother::new(0);
        smoother.generate_surface(&input);
        assert_eq!(smoother.surface(), &input);
    }

    #[test]
    fn test_subdivision_dimensions() {
        let input = SurfaceGrid::from_fn(3, 4, |r, c| DVec3::new(c as f64, 0.0, r as f64));
        let mut smoother = SubdivisionSmoother::new(1);
        smoother.generate_surface(&input);
        assert_eq!(smoother.surface().length(), 5);
        assert_eq!(smoother.surface().width(), 7);
    }

    #[test]
    fn test_subdivision_interpolates_and_keeps_originals() {
        let input = SurfaceGrid::from_fn(2, 2, |r, c| {
            DVec3::new(c as f64, (r * 2 + c) as f64 * 2.0, r as f64)
        });
        let mut smoother = SubdivisionSmoother::new(1);
        smoother.generate_surface(&input);
        let out = smoother.surface();

        assert_eq!(out.get(0, 0), input.get(0, 0));
        assert_eq!(out.get(2, 2), input.get(1, 1));
        // Centre of the cell is the mean of the four corners.
        let centre = out.get(1, 1).unwrap();
        assert!((centre.y - 3.0).abs() < EPSILON);
        assert!((centre.x - 0.5).abs() < EPSILON);
        assert!((centre.z - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_oversized_subdivision_is_clamped() {
        let input = SurfaceGrid::from_fn(2, 2, |r, c| DVec3::new(c as f64, 1.0, r as f64));
        let mut smoother = SubdivisionSmoother::new(i32::MAX);
        smoother.generate_surface(&input);
        let side = MAX_SUBDIVISIONS as usize + 2;
        assert_eq!(smoother.surface().length(), side);
        assert_eq!(smoother.surface().width(), side);
        assert!(smoother.surface().heights().iter().all(|&h| h == 1.0));
    }

    #[test]
    fn test_mirror_index() {
        assert_eq!(mirror(-1, 5), 1);
        assert_eq!(mirror(5, 5), 3);
        assert_eq!(mirror(2, 5), 2);
        assert_eq!(mirror(-1, 1), 0);
        assert_eq!(mirror(1, 1), 0);
    }
}
