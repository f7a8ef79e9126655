use crate::grid::Grid;

/// How a field behaves at the walls of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Edge cells copy their interior neighbour unchanged (density, pressure, divergence).
    Scalar,
    /// Edge cells on the left and right walls copy their neighbour with the sign flipped, so the
    /// X component of velocity cancels across those walls.
    MirrorX,
    /// Edge cells on the top and bottom walls copy their neighbour with the sign flipped, so the
    /// Y component of velocity cancels across those walls.
    MirrorY,
}

impl Boundary {
    #[inline]
    fn sign_x(self) -> f32 {
        if self == Boundary::MirrorX { -1.0 } else { 1.0 }
    }

    #[inline]
    fn sign_y(self) -> f32 {
        if self == Boundary::MirrorY { -1.0 } else { 1.0 }
    }
}

/// Rewrites the outermost ring of `field` from the cells just inside it.
///
/// Corners take the mean of their two edge neighbours. The grid must be at least 3 cells wide.
pub fn enforce_boundary(kind: Boundary, field: &mut Grid) {
    let n = field.size();
    debug_assert!(n >= 3, "boundary needs an interior, got a {n}x{n} grid");

    let sx = kind.sign_x();
    let sy = kind.sign_y();

    for i in 1..n - 1 {
        field[(i, 0)] = sy * field[(i, 1)];
        field[(i, n - 1)] = sy * field[(i, n - 2)];
    }

    for j in 1..n - 1 {
        field[(0, j)] = sx * field[(1, j)];
        field[(n - 1, j)] = sx * field[(n - 2, j)];
    }

    field[(0, 0)] = 0.5 * (field[(1, 0)] + field[(0, 1)]);
    field[(0, n - 1)] = 0.5 * (field[(1, n - 1)] + field[(0, n - 2)]);
    field[(n - 1, 0)] = 0.5 * (field[(n - 2, 0)] + field[(n - 1, 1)]);
    field[(n - 1, n - 1)] = 0.5 * (field[(n - 2, n - 1)] + field[(n - 1, n - 2)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 16;

    /// A field with a distinct value in every cell.
    fn ramp() -> Grid {
        let mut field = Grid::new(N);
        for j in 0..N {
            for i in 0..N {
                field[(i, j)] = 1.0 + i as f32 + 0.5 * (j * j) as f32;
            }
        }
        field
    }

    #[test]
    fn test_mirror_x_negates_left_and_right_walls() {
        let mut field = ramp();
        enforce_boundary(Boundary::MirrorX, &mut field);

        for j in 1..N - 1 {
            assert_eq!(field[(0, j)], -field[(1, j)], "left wall at y={j}");
            assert_eq!(field[(N - 1, j)], -field[(N - 2, j)], "right wall at y={j}");
        }
        for i in 1..N - 1 {
            assert_eq!(field[(i, 0)], field[(i, 1)], "bottom wall at x={i}");
            assert_eq!(field[(i, N - 1)], field[(i, N - 2)], "top wall at x={i}");
        }
    }

    #[test]
    fn test_mirror_y_negates_top_and_bottom_walls() {
        let mut field = ramp();
        enforce_boundary(Boundary::MirrorY, &mut field);

        for i in 1..N - 1 {
            assert_eq!(field[(i, 0)], -field[(i, 1)], "bottom wall at x={i}");
            assert_eq!(field[(i, N - 1)], -field[(i, N - 2)], "top wall at x={i}");
        }
        for j in 1..N - 1 {
            assert_eq!(field[(0, j)], field[(1, j)], "left wall at y={j}");
            assert_eq!(field[(N - 1, j)], field[(N - 2, j)], "right wall at y={j}");
        }
    }

    #[test]
    fn test_scalar_copies_without_negation() {
        let mut field = ramp();
        enforce_boundary(Boundary::Scalar, &mut field);

        for k in 1..N - 1 {
            assert_eq!(field[(0, k)], field[(1, k)]);
            assert_eq!(field[(N - 1, k)], field[(N - 2, k)]);
            assert_eq!(field[(k, 0)], field[(k, 1)]);
            assert_eq!(field[(k, N - 1)], field[(k, N - 2)]);
        }
    }

    #[test]
    fn test_corners_average_their_edge_neighbours() {
        let mut field = ramp();
        enforce_boundary(Boundary::MirrorX, &mut field);

        assert_eq!(field[(0, 0)], 0.5 * (field[(1, 0)] + field[(0, 1)]));
        assert_eq!(field[(N - 1, N - 1)], 0.5 * (field[(N - 2, N - 1)] + field[(N - 1, N - 2)]));
    }

    #[test]
    fn test_interior_is_untouched() {
        let before = ramp();
        let mut field = before.clone();
        enforce_boundary(Boundary::MirrorY, &mut field);

        for j in 1..N - 1 {
            for i in 1..N - 1 {
                assert_eq!(field[(i, j)], before[(i, j)]);
            }
        }
    }
}
