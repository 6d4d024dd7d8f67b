use std::ops::{Index, IndexMut};

use glam::{UVec2, Vec2};
use ndarray::{s, Array2, ArrayView2, ShapeBuilder};

/// Square simulation grid with a one-cell ghost border on every side.
///
/// Interior cells are `1..=n` along both axes, `0` and `n + 1` are ghost cells. Every field on
/// the grid is stored flat, with cell `(i, j)` at `i + (n + 2) * j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    n: usize,
}

impl Grid {
    /// Creates a grid with `n` interior cells per axis.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "grid resolution must be at least one cell");
        Self { n }
    }

    /// Number of interior cells along each axis.
    #[inline(always)]
    pub fn resolution(&self) -> usize {
        self.n
    }

    /// Number of stored cells along each axis, ghost border included.
    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.n + 2
    }

    /// Number of stored cells in a field, `(n + 2)²`.
    #[inline(always)]
    pub fn cell_count(&self) -> usize {
        self.stride() * self.stride()
    }

    #[inline(always)]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        i + self.stride() * j
    }

    /// Whether `(i, j)` is an interior (non-ghost) cell.
    #[inline]
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        (1..=self.n).contains(&i) && (1..=self.n).contains(&j)
    }
}

/// Maps a point of the unit square onto the interior cell that contains it.
///
/// The result is always clamped to `[1, n]`, so pointer positions outside the domain land on
/// the nearest edge cell.
pub fn grid_cell(p: Vec2, n: usize) -> UVec2 {
    let n = n as u32;
    (p * n as f32).floor().as_uvec2().min(UVec2::splat(n - 1)) + 1
}

/// A scalar field over a [`Grid`], ghost border included.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    grid: Grid,
    /// Column-major so that `data[(i, j)]` lives at `i + (n + 2) * j` in memory.
    data: Array2<f32>,
}

impl Field {
    pub fn zeros(grid: Grid) -> Self {
        let s = grid.stride();

        Self {
            grid,
            data: Array2::zeros((s, s).f()),
        }
    }

    #[inline(always)]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// The field as a flat slice in [`Grid::idx`] order.
    pub fn as_slice(&self) -> &[f32] {
        self.data
            .as_slice_memory_order()
            .expect("field storage is always contiguous")
    }

    /// View of the interior cells, indexed from `(0, 0)`.
    pub fn interior(&self) -> ArrayView2<'_, f32> {
        let n = self.grid.resolution();
        self.data.slice(s![1..=n, 1..=n])
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// `self += dt * source` over every stored cell.
    pub fn add_scaled(&mut self, source: &Field, dt: f32) {
        self.data.scaled_add(dt, &source.data);
    }
}

impl Index<(usize, usize)> for Field {
    type Output = f32;

    #[inline(always)]
    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Field {
    #[inline(always)]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f32 {
        &mut self.data[index]
    }
}

/// A field and its scratch buffer.
///
/// The scratch buffer doubles as the per-tick source buffer. Operators that read the previous
/// state and write a new one exchange roles with [`FieldPair::swap`] instead of copying.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair {
    pub current: Field,
    pub scratch: Field,
}

impl FieldPair {
    pub fn zeros(grid: Grid) -> Self {
        Self {
            current: Field::zeros(grid),
            scratch: Field::zeros(grid),
        }
    }

    /// Exchanges the roles of the current and scratch buffers.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.scratch);
    }
}
