//! Read-only measurements over fluid grids.

use ndarray::{azip, s};

use crate::grid::Grid;

/// Sum of every cell, walls included.
pub fn total(grid: &Grid) -> f32 {
    grid.iter().sum()
}

/// Largest value in the grid (`-inf` for an empty grid).
pub fn max(grid: &Grid) -> f32 {
    grid.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

pub fn is_finite(grid: &Grid) -> bool {
    grid.iter().all(|v| v.is_finite())
}

/// Euclidean norm of all cells.
pub fn l2_norm(grid: &Grid) -> f32 {
    grid.iter().map(|v| v * v).sum::<f32>().sqrt()
}

/// Central-difference divergence of a velocity field, on interior cells only.
///
/// Wall cells are left at zero. Unlike the projection's working buffer this carries no sign flip
/// or grid scaling: positive values are net outflow.
pub fn interior_divergence(velocity_x: &Grid, velocity_y: &Grid) -> Grid {
    let n = velocity_x.size();
    let mut div = Grid::new(n);

    for j in 1..n.saturating_sub(1) {
        for i in 1..n - 1 {
            div[(i, j)] = 0.5 * (
                velocity_x[(i + 1, j)] - velocity_x[(i - 1, j)]
                + velocity_y[(i, j + 1)] - velocity_y[(i, j - 1)]
            );
        }
    }

    div
}

/// Mean kinetic energy per interior cell, `0.5 * <vx² + vy²>`.
pub fn kinetic_energy(velocity_x: &Grid, velocity_y: &Grid) -> f32 {
    let n = velocity_x.size();
    if n < 3 {
        return 0.0;
    }

    let vx_inner = velocity_x.view().slice_move(s![1..n - 1, 1..n - 1]);
    let vy_inner = velocity_y.view().slice_move(s![1..n - 1, 1..n - 1]);

    let mut sum = 0.0;
    azip!((vx in &vx_inner, vy in &vy_inner) {
        sum += vx * vx + vy * vy;
    });

    let interior = ((n - 2) * (n - 2)) as f32;
    0.5 * sum / interior
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_max() {
        let mut grid = Grid::new(4);
        grid[(1, 1)] = 2.0;
        grid[(0, 3)] = 5.0;
        assert_eq!(total(&grid), 7.0);
        assert_eq!(max(&grid), 5.0);
    }

    #[test]
    fn test_is_finite_catches_nan() {
        let mut grid = Grid::new(4);
        assert!(is_finite(&grid));
        grid[(2, 2)] = f32::NAN;
        assert!(!is_finite(&grid));
    }

    #[test]
    fn test_uniform_flow_has_no_divergence() {
        let vx = Grid::from_elem(8, 1.5);
        let vy = Grid::from_elem(8, -0.5);
        let div = interior_divergence(&vx, &vy);
        assert_eq!(l2_norm(&div), 0.0);
    }

    #[test]
    fn test_source_has_positive_divergence() {
        let n = 8;
        let mut vx = Grid::new(n);
        let vy = Grid::new(n);
        vx[(5, 4)] = 1.0;
        vx[(3, 4)] = -1.0;
        let div = interior_divergence(&vx, &vy);
        assert_eq!(div[(4, 4)], 1.0);
    }

    #[test]
    fn test_kinetic_energy_ignores_walls() {
        let n = 6;
        let mut vx = Grid::new(n);
        let mut vy = Grid::new(n);
        vx[(0, 2)] = 100.0;
        vy[(5, 5)] = 100.0;
        assert_eq!(kinetic_energy(&vx, &vy), 0.0);

        vx[(2, 2)] = 4.0;
        assert_eq!(kinetic_energy(&vx, &vy), 0.5 * 16.0 / 16.0);
    }
}
