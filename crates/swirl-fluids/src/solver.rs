//! The numerical operators of the stable-fluids step.
//!
//! Every operator works on interior cells (`1..N-1` on both axes) and finishes by rewriting the
//! walls with [`enforce_boundary`]. Grids passed to one call must all have the same size.

use glam::Vec2;

use crate::{boundary::{enforce_boundary, Boundary}, grid::Grid};

/// Gauss-Seidel relaxation of `x * c = x0 + a * (sum of the 4 neighbours of x)`.
///
/// Each sweep updates `x` in place, so cells later in the sweep already see their updated left
/// and lower neighbours. The walls are rewritten after every sweep. The current contents of `x`
/// are the initial guess. `c` must be non-zero.
pub fn relax(kind: Boundary, x: &mut Grid, x0: &Grid, a: f32, c: f32, iterations: usize) {
    debug_assert!(c != 0.0, "relaxation divides by c");

    let n = x.size();
    let c_recip = c.recip();

    for _iter in 0..iterations {
        for j in 1..n - 1 {
            for i in 1..n - 1 {
                let neighbors = x[(i + 1, j)]
                    + x[(i - 1, j)]
                    + x[(i, j + 1)]
                    + x[(i, j - 1)];

                x[(i, j)] = (x0[(i, j)] + a * neighbors) * c_recip;
            }
        }

        enforce_boundary(kind, x);
    }
}

/// Implicit diffusion of `input` into `out` at `rate`.
///
/// The coupling `a` is scaled by the interior resolution `(N-2)²` so the effective spread does
/// not depend on the grid size.
pub fn diffuse(kind: Boundary, out: &mut Grid, input: &Grid, rate: f32, dt: f32, iterations: usize) {
    let interior = (out.size() - 2) as f32;
    let a = dt * rate * interior * interior;

    relax(kind, out, input, a, 1.0 + 6.0 * a, iterations);
}

/// Removes the divergent part of a velocity field.
///
/// `p` and `divergence` are working buffers; their previous contents are discarded.
pub fn project(
    velocity_x: &mut Grid,
    velocity_y: &mut Grid,
    p: &mut Grid,
    divergence: &mut Grid,
    iterations: usize,
) {
    let n = velocity_x.size();
    let h = n as f32;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            divergence[(i, j)] = -0.5 * (
                velocity_x[(i + 1, j)] - velocity_x[(i - 1, j)]
                + velocity_y[(i, j + 1)] - velocity_y[(i, j - 1)]
            ) / h;
            p[(i, j)] = 0.0;
        }
    }

    enforce_boundary(Boundary::Scalar, divergence);
    enforce_boundary(Boundary::Scalar, p);
    relax(Boundary::Scalar, p, divergence, 1.0, 6.0, iterations);

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            velocity_x[(i, j)] -= 0.5 * (p[(i + 1, j)] - p[(i - 1, j)]) * h;
            velocity_y[(i, j)] -= 0.5 * (p[(i, j + 1)] - p[(i, j - 1)]) * h;
        }
    }

    enforce_boundary(Boundary::MirrorX, velocity_x);
    enforce_boundary(Boundary::MirrorY, velocity_y);
}

/// Semi-Lagrangian advection of `input` into `out` along the velocity field.
///
/// Each interior cell traces back by `dt * (N-2)` times its velocity and takes the bilinearly
/// interpolated value found there. The trace is clamped into the grid, so any `dt` is stable.
pub fn advect(
    kind: Boundary,
    out: &mut Grid,
    input: &Grid,
    velocity_x: &Grid,
    velocity_y: &Grid,
    dt: f32,
) {
    let n = out.size();
    let dt0 = dt * (n - 2) as f32;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let cell = Vec2::new(i as f32, j as f32);
            let velocity = Vec2::new(velocity_x[(i, j)], velocity_y[(i, j)]);

            out[(i, j)] = input.sample(cell - dt0 * velocity);
        }
    }

    enforce_boundary(kind, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{interior_divergence, l2_norm, total};

    const N: usize = 32;

    #[test]
    fn test_relax_without_coupling_is_a_fixed_point() {
        let x0 = Grid::from_elem(N, 2.5);
        let mut x = x0.clone();

        relax(Boundary::Scalar, &mut x, &x0, 0.0, 1.0, 20);

        assert_eq!(x, x0);
    }

    #[test]
    fn test_relax_converges_towards_the_implicit_solution() {
        // With a uniform x0 the interior solution of x * c = x0 + 4 a x is x0 / (c - 4a).
        let x0 = Grid::from_elem(N, 1.0);
        let a = 0.5;
        let c = 1.0 + 6.0 * a;
        let expected = 1.0 / (c - 4.0 * a);

        let mut few = Grid::new(N);
        relax(Boundary::Scalar, &mut few, &x0, a, c, 2);
        let mut many = Grid::new(N);
        relax(Boundary::Scalar, &mut many, &x0, a, c, 60);

        let centre = (N / 2, N / 2);
        let err_few = (few[centre] - expected).abs();
        let err_many = (many[centre] - expected).abs();
        assert!(err_many < err_few, "more sweeps should converge: {err_many} vs {err_few}");
        assert!(err_many < 1e-3, "err after 60 sweeps: {err_many}");
    }

    #[test]
    fn test_diffuse_spreads_but_keeps_sign() {
        let mut input = Grid::new(N);
        input[(N / 2, N / 2)] = 10.0;
        let mut out = Grid::new(N);

        diffuse(Boundary::Scalar, &mut out, &input, 0.01, 0.1, 4);

        assert!(out[(N / 2, N / 2)] < 10.0);
        assert!(out[(N / 2 + 1, N / 2)] > 0.0);
        assert!(out[(N / 2, N / 2 + 1)] > 0.0);
        assert!(out.iter().all(|&v| v >= 0.0));
        assert!(total(&out) <= total(&input));
    }

    #[test]
    fn test_diffuse_with_zero_rate_copies() {
        let mut input = Grid::new(N);
        input[(7, 9)] = 3.0;
        input[(20, 4)] = -1.0;
        let mut out = Grid::new(N);

        diffuse(Boundary::Scalar, &mut out, &input, 0.0, 0.1, 4);

        assert_eq!(out[(7, 9)], 3.0);
        assert_eq!(out[(20, 4)], -1.0);
    }

    #[test]
    fn test_advect_with_zero_velocity_is_identity() {
        let mut input = Grid::new(N);
        for j in 0..N {
            for i in 0..N {
                input[(i, j)] = (i * 3 + j * 7) as f32 * 0.25;
            }
        }
        let zero = Grid::new(N);
        let mut out = Grid::new(N);

        advect(Boundary::Scalar, &mut out, &input, &zero, &zero, 0.5);

        for j in 1..N - 1 {
            for i in 1..N - 1 {
                assert_eq!(out[(i, j)], input[(i, j)], "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_advect_moves_values_downstream() {
        let mut input = Grid::new(N);
        input[(10, 16)] = 1.0;

        // dt * (N - 2) * vx = 1 cell.
        let dt = 0.1;
        let vx = Grid::from_elem(N, 1.0 / (dt * (N - 2) as f32));
        let vy = Grid::new(N);
        let mut out = Grid::new(N);

        advect(Boundary::Scalar, &mut out, &input, &vx, &vy, dt);

        assert!((out[(11, 16)] - 1.0).abs() < 1e-4, "got {}", out[(11, 16)]);
        assert!(out[(10, 16)].abs() < 1e-4, "got {}", out[(10, 16)]);
    }

    #[test]
    fn test_advect_clamps_traces_leaving_the_grid() {
        let input = Grid::from_elem(N, 4.0);
        let vx = Grid::from_elem(N, 1.0e6);
        let vy = Grid::from_elem(N, -1.0e6);
        let mut out = Grid::new(N);

        advect(Boundary::Scalar, &mut out, &input, &vx, &vy, 1.0);

        assert!(out.iter().all(|&v| v == 4.0));
    }

    #[test]
    fn test_project_reduces_divergence_of_an_impulse() {
        let mut vx = Grid::new(N);
        let mut vy = Grid::new(N);
        vx[(10, 20)] = 5.0;
        vy[(10, 20)] = 2.0;

        let before = l2_norm(&interior_divergence(&vx, &vy));

        let mut p = Grid::new(N);
        let mut div = Grid::new(N);
        project(&mut vx, &mut vy, &mut p, &mut div, 4);

        let after = l2_norm(&interior_divergence(&vx, &vy));
        assert!(after < before, "divergence {before} -> {after}");
    }

    #[test]
    fn test_project_leaves_walls_reflective() {
        let mut vx = Grid::new(N);
        let mut vy = Grid::new(N);
        vx[(1, 5)] = 3.0;
        vy[(6, 1)] = -2.0;

        let mut p = Grid::new(N);
        let mut div = Grid::new(N);
        project(&mut vx, &mut vy, &mut p, &mut div, 4);

        for k in 1..N - 1 {
            assert_eq!(vx[(0, k)], -vx[(1, k)]);
            assert_eq!(vy[(k, 0)], -vy[(k, 1)]);
        }
    }
}
