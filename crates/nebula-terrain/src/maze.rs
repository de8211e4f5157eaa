//! Maze terrain generator: a perfect maze carved by recursive backtracking,
//! with walls raised to `height_scale` and passages at ground level.

use glam::DVec3;
use nebula_mesh::SurfaceGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::TerrainError;
use crate::generator::{GenerationParams, GeometryGenerator};

/// Carved layout of a maze including its wall lattice.
///
/// A maze of `r x c` cells occupies a `(2r + 1) x (2c + 1)` layout: cells sit
/// at odd coordinates and the walls between them at the even ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MazeLayout {
    rows: usize,
    columns: usize,
    passages: Vec<bool>,
}

impl MazeLayout {
    fn walled(cell_rows: usize, cell_columns: usize) -> Self {
        let rows = 2 * cell_rows + 1;
        let columns = 2 * cell_columns + 1;
        Self {
            rows,
            columns,
            passages: vec![false; rows * columns],
        }
    }

    fn open(&mut self, row: usize, column: usize) {
        self.passages[row * self.columns + column] = true;
    }

    /// Layout rows (walls included).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Layout columns (walls included).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether the layout position is open floor. Out-of-range positions are walls.
    pub fn is_passage(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns && self.passages[row * self.columns + column]
    }

    /// Number of open positions.
    pub fn passage_count(&self) -> usize {
        self.passages.iter().filter(|&&open| open).count()
    }
}

/// Carve a perfect maze of `cell_rows x cell_columns` cells.
///
/// Iterative depth-first backtracker starting at cell (0, 0); every cell is
/// reachable from every other by exactly one path.
pub fn carve_maze(cell_rows: usize, cell_columns: usize, seed: u64) -> MazeLayout {
    if cell_rows == 0 || cell_columns == 0 {
        return MazeLayout::default();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = MazeLayout::walled(cell_rows, cell_columns);
    let mut visited = vec![false; cell_rows * cell_columns];
    let mut stack = vec![(0_usize, 0_usize)];
    visited[0] = true;
    layout.open(1, 1);

    while let Some(&(row, column)) = stack.last() {
        let mut unvisited = [(0, 0); 4];
        let mut count = 0;
        let candidates = [
            (row.wrapping_sub(1), column),
            (row + 1, column),
            (row, column.wrapping_sub(1)),
            (row, column + 1),
        ];
        for (r, c) in candidates {
            if r < cell_rows && c < cell_columns && !visited[r * cell_columns + c] {
                unvisited[count] = (r, c);
                count += 1;
            }
        }

        if count == 0 {
            stack.pop();
            continue;
        }

        let (next_row, next_column) = unvisited[rng.random_range(0..count)];
        visited[next_row * cell_columns + next_column] = true;
        // Wall between the two cells sits at the midpoint of their layout positions.
        layout.open(row + next_row + 1, column + next_column + 1);
        layout.open(2 * next_row + 1, 2 * next_column + 1);
        stack.push((next_row, next_column));
    }

    layout
}

/// Maze terrain. `params.rows` / `params.columns` count maze cells, so the
/// generated grid is `(2 * rows + 1) x (2 * columns + 1)`. `params.seed`
/// drives the carving order.
#[derive(Debug, Default)]
pub struct MazeGenerator {
    layout: MazeLayout,
    grid: SurfaceGrid,
}

impl MazeGenerator {
    /// Create a generator with no maze yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout of the last generated maze.
    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }
}

impl GeometryGenerator for MazeGenerator {
    fn generate_geometry(&mut self, params: &GenerationParams) -> Result<(), TerrainError> {
        let layout = carve_maze(params.rows, params.columns, params.seed);
        let grid = SurfaceGrid::from_fn(layout.rows(), layout.columns(), |r, c| {
            let height = if layout.is_passage(r, c) {
                0.0
            } else {
                params.height_scale
            };
            DVec3::new(c as f64 * params.spacing, height, r as f64 * params.spacing)
        });
        log::debug!(
            "carved {}x{} maze (seed {})",
            params.rows,
            params.columns,
            params.seed
        );
        self.layout = layout;
        self.grid = grid;
        Ok(())
    }

    fn surface(&self) -> &SurfaceGrid {
        &self.grid
    }
}
