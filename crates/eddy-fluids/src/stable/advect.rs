use glam::Vec2;

use crate::grid::Field;

use super::{boundary::enforce, BoundaryKind};

/// Semi-Lagrangian advection: traces every interior cell of `d` backwards through `(u, v)` and
/// samples `d0` there with bilinear interpolation.
///
/// Traced positions are clamped to `[0.5, n + 0.5]` on both axes, so samples never leave the
/// stored array. `d0`, `u` and `v` may be the same buffer; `d` must not be.
pub fn advect(d: &mut Field, d0: &Field, u: &Field, v: &Field, dt: f32, kind: BoundaryKind) {
    let n = d.grid().resolution();
    let nf = n as f32;
    let dt0 = dt * nf;
    let lo = Vec2::splat(0.5);
    let hi = Vec2::splat(nf + 0.5);

    for i in 1..=n {
        for j in 1..=n {
            let p = Vec2::new(
                i as f32 - dt0 * u[(i, j)],
                j as f32 - dt0 * v[(i, j)],
            ).clamp(lo, hi);

            let p0 = p.floor().as_uvec2();
            let t = p - p0.as_vec2();
            let s = 1.0 - t;

            let (i0, j0) = (p0.x as usize, p0.y as usize);
            let (i1, j1) = (i0 + 1, j0 + 1);

            d[(i, j)] = s.x * (s.y * d0[(i0, j0)] + t.y * d0[(i0, j1)])
                + t.x * (s.y * d0[(i1, j0)] + t.y * d0[(i1, j1)]);
        }
    }

    enforce(d, kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn uniform(grid: Grid, value: f32) -> Field {
        let mut f = Field::zeros(grid);
        f.fill(value);
        f
    }

    #[test]
    fn test_zero_velocity_preserves_field() {
        let grid = Grid::new(6);
        let mut d0 = Field::zeros(grid);
        for i in 1..=6 {
            for j in 1..=6 {
                d0[(i, j)] = (i + 2 * j) as f32;
            }
        }
        let zero = Field::zeros(grid);
        let mut d = Field::zeros(grid);

        advect(&mut d, &d0, &zero, &zero, 0.1, BoundaryKind::Scalar);

        assert_eq!(d.interior(), d0.interior());
    }

    #[test]
    fn test_whole_cell_shift() {
        // dt * n * u = 1 moves the field exactly one cell to the right.
        let grid = Grid::new(4);
        let mut d0 = Field::zeros(grid);
        d0[(2, 2)] = 10.0;
        let u = uniform(grid, 0.25);
        let v = Field::zeros(grid);
        let mut d = Field::zeros(grid);

        advect(&mut d, &d0, &u, &v, 1.0, BoundaryKind::Scalar);

        assert_eq!(d[(3, 2)], 10.0);
        assert_eq!(d[(2, 2)], 0.0);
    }

    #[test]
    fn test_half_cell_shift_interpolates() {
        let grid = Grid::new(4);
        let mut d0 = Field::zeros(grid);
        d0[(2, 2)] = 10.0;
        let u = Field::zeros(grid);
        let v = uniform(grid, 0.125);
        let mut d = Field::zeros(grid);

        advect(&mut d, &d0, &u, &v, 1.0, BoundaryKind::Scalar);

        assert_eq!(d[(2, 2)], 5.0);
        assert_eq!(d[(2, 3)], 5.0);
    }

    #[test]
    fn test_backtrace_is_clamped() {
        let grid = Grid::new(4);
        let mut d0 = Field::zeros(grid);
        d0.fill(1.0);
        d0[(0, 3)] = 3.0;
        d0[(1, 3)] = 5.0;
        let u = uniform(grid, 1000.0);
        let v = Field::zeros(grid);
        let mut d = Field::zeros(grid);

        advect(&mut d, &d0, &u, &v, 1.0, BoundaryKind::Scalar);

        // Clamped to x = 0.5, halfway between the ghost and the first interior column.
        assert_eq!(d[(4, 3)], 4.0);
        assert!(d.as_slice().iter().all(|v| v.is_finite()));
    }
}
