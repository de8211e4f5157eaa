//! Rectangular point grids: the shared shape of heightfields, generated meshes,
//! and smoothed surfaces.
//!
//! Points are stored row-major. Elevation lives on the Y axis; columns advance
//! along X and rows along Z. Connectivity is implicit: every interior point is
//! joined to its four grid neighbours, giving two triangles per cell.

use glam::{DVec3, Vec3};
use thiserror::Error;

/// Shape violations detected while constructing a [`SurfaceGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The declared dimensions do not match the number of supplied points.
    #[error("grid declared as {rows}x{columns} but {points} points were supplied")]
    DimensionMismatch {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
        /// Actual number of points.
        points: usize,
    },

    /// A row has a different length than the first row.
    #[error("row {row} has {found} points, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// A rectangular, row-major grid of 3D points.
///
/// Once built the grid is treated as a value: producers hand out shared
/// references and build a new grid rather than editing one in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceGrid {
    rows: usize,
    columns: usize,
    points: Vec<DVec3>,
}

impl SurfaceGrid {
    /// The empty grid (0 rows, 0 columns).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a grid from a flat row-major point buffer.
    ///
    /// A grid with zero rows or zero columns is normalized to the empty grid,
    /// so `length() * width()` always equals `point_count()`.
    pub fn new(rows: usize, columns: usize, points: Vec<DVec3>) -> Result<Self, GridError> {
        if rows.checked_mul(columns) != Some(points.len()) {
            return Err(GridError::DimensionMismatch {
                rows,
                columns,
                points: points.len(),
            });
        }
        if points.is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self {
            rows,
            columns,
            points,
        })
    }

    /// Build a grid from nested rows. All rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<DVec3>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut points = Vec::with_capacity(row_count * expected);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(GridError::RaggedRows {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            points.extend(values);
        }
        Self::new(row_count, expected, points)
    }

    /// Build a grid by evaluating `f(row, column)` for every cell in row-major order.
    ///
    /// Zero rows or zero columns give the empty grid without calling `f`.
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> DVec3) -> Self {
        if rows == 0 || columns == 0 {
            return Self::empty();
        }
        let mut points = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                points.push(f(row, column));
            }
        }
        if points.is_empty() {
            return Self::empty();
        }
        Self {
            rows,
            columns,
            points,
        }
    }

    /// Number of rows.
    pub fn length(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns
    }

    /// Total number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the grid holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `(row, column)`, or `None` if out of range.
    pub fn get(&self, row: usize, column: usize) -> Option<DVec3> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(self.points[row * self.columns + column])
    }

    /// Points of one row, or `None` if out of range.
    pub fn row(&self, row: usize) -> Option<&[DVec3]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.points[start..start + self.columns])
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[DVec3]> {
        // chunks_exact panics on 0; an empty grid yields nothing either way.
        self.points.chunks_exact(self.columns.max(1))
    }

    /// All points in row-major order.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Elevations (Y components) in row-major order.
    pub fn heights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Return a copy of the grid with every elevation replaced by `f(row, column, point)`.
    pub fn map_heights(&self, mut f: impl FnMut(usize, usize, DVec3) -> f64) -> Self {
        Self::from_fn(self.rows, self.columns, |row, column| {
            let p = self.points[row * self.columns + column];
            DVec3::new(p.x, f(row, column, p), p.z)
        })
    }

    /// Minimum and maximum elevation, or `None` for an empty grid.
    pub fn height_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.y);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Triangle list indices: two counter-clockwise triangles per cell, viewed from +Y.
    ///
    /// Grids with fewer than two rows or columns have no cells and yield no indices.
    pub fn triangle_indices(&self) -> Vec<u32> {
        if self.rows < 2 || self.columns < 2 {
            return Vec::new();
        }
        let cells = (self.rows - 1) * (self.columns - 1);
        let mut indices = Vec::with_capacity(cells * 6);
        let stride = self.columns as u32;
        for row in 0..(self.rows as u32 - 1) {
            for column in 0..(self.columns as u32 - 1) {
                let top_left = row * stride + column;
                let top_right = top_left + 1;
                let bottom_left = top_left + stride;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }
        indices
    }

    /// Per-vertex normals from central differences over the grid neighbours.
    ///
    /// Edge points fall back to one-sided differences; degenerate grids get +Y.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = Vec::with_capacity(self.points.len());
        for row in 0..self.rows {
            for column in 0..self.columns {
                let left = self.points[row * self.columns + column.saturating_sub(1)];
                let right = self.points[row * self.columns + (column + 1).min(self.columns - 1)];
                let up = self.points[row.saturating_sub(1) * self.columns + column];
                let down = self.points[(row + 1).min(self.rows - 1) * self.columns + column];

                let along_x = right - left;
                let along_z = down - up;
                let n = along_z.cross(along_x);
                let normal = if n.length_squared() > 0.0 {
                    n.normalize()
                } else {
                    DVec3::Y
                };
                normals.push(normal.as_vec3());
            }
        }
        normals
    }

    /// Positions narrowed to `f32`, ready for vertex-buffer upload.
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.points
            .iter()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }
}

/// A grid with its triangle connectivity resolved, in upload-ready form.
#[derive(Clone, Debug, Default)]
pub struct GridMesh {
    /// Vertex positions, one per grid point.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, parallel to `positions`.
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Triangulate a grid.
    pub fn from_grid(grid: &SurfaceGrid) -> Self {
        Self {
            positions: grid.positions_f32(),
            normals: grid.vertex_normals().iter().map(|n| n.to_array()).collect(),
            indices: grid.triangle_indices(),
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position buffer as raw bytes.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
