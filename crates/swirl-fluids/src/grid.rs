use std::ops::{Index, IndexMut};

use glam::Vec2;
use ndarray::{Array2, ArrayView2};

/// A square grid of cell values stored in one contiguous buffer.
///
/// Cell `(x, y)` lives at flat offset `x + y * size`: rows of constant `y` are laid out one after
/// another. Every field of a fluid shares this layout, so a flat slice from [`Grid::as_slice`]
/// can be handed to a renderer as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    /// Cell values, indexed `(y, x)` so that the standard layout matches `x + y * size`.
    cells: Array2<f32>,
}

impl Grid {
    /// Creates a `size` x `size` grid of zeros.
    pub fn new(size: usize) -> Self {
        Self::from_elem(size, 0.0)
    }

    pub fn from_elem(size: usize, value: f32) -> Self {
        Self {
            size,
            cells: Array2::from_elem((size, size), value),
        }
    }

    /// Builds a grid from cells in `x + y * size` order, or `None` if the count is not `size²`.
    pub fn from_cells(size: usize, cells: Vec<f32>) -> Option<Self> {
        Array2::from_shape_vec((size, size), cells)
            .ok()
            .map(|cells| Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[(y, x)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.cells[(y, x)] = value;
    }

    /// Returns the value at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn try_get(&self, x: usize, y: usize) -> Option<f32> {
        self.cells.get((y, x)).copied()
    }

    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    /// The cells in `x + y * size` order.
    pub fn as_slice(&self) -> &[f32] {
        self.cells
            .as_slice()
            .expect("grid cells are always in standard layout")
    }

    /// A 2D view of the cells, indexed `[(y, x)]`.
    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.cells.view()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.cells.iter()
    }

    /// Bilinearly interpolates the grid at a continuous cell position.
    ///
    /// The position is clamped into `[0.5, size - 1.5]` on both axes so the four samples stay
    /// inside the grid. The grid must be at least 3 cells wide.
    pub fn sample(&self, p: Vec2) -> f32 {
        let max = self.size as f32 - 1.5;
        let x = p.x.clamp(0.5, max);
        let y = p.y.clamp(0.5, max);

        let x0 = x.floor();
        let y0 = y.floor();

        let s1 = x - x0;
        let s0 = 1.0 - s1;
        let t1 = y - y0;
        let t0 = 1.0 - t1;

        let i0 = x0 as usize;
        let i1 = i0 + 1;
        let j0 = y0 as usize;
        let j1 = j0 + 1;

        s0 * (t0 * self[(i0, j0)] + t1 * self[(i0, j1)])
            + s1 * (t0 * self[(i1, j0)] + t1 * self[(i1, j1)])
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f32;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        &self.cells[(y, x)]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        &mut self.cells[(y, x)]
    }
}
