//! Surface grids and their refinement: rectangular point grids, implicit grid
//! triangulation, and the relaxation/subdivision smoothers.

pub mod grid;
pub mod smoothing;

pub use grid::{GridError, GridMesh, SurfaceGrid};
pub use smoothing::{
    BoundaryPolicy, MAX_SUBDIVISIONS, RelaxationParams, RelaxationSmoother, SubdivisionSmoother, SurfaceSmoother,
};
