use crate::grid::Field;

use super::{boundary::enforce, relax::relax, BoundaryKind};

/// Removes most of the divergent part of `(u, v)`.
///
/// Computes the central-difference divergence into `div`, relaxes the pressure Poisson
/// equation into `p` for `iterations` sweeps starting from zero, then subtracts the pressure
/// gradient. The result is only approximately divergence-free; the residual depends on the
/// iteration count. `p` and `div` are scratch space and hold no meaningful input.
pub fn project(u: &mut Field, v: &mut Field, p: &mut Field, div: &mut Field, iterations: usize) {
    let n = u.grid().resolution();
    let h = (n as f32).recip();

    for i in 1..=n {
        for j in 1..=n {
            div[(i, j)] = -0.5 * h * (u[(i + 1, j)] - u[(i - 1, j)] + v[(i, j + 1)] - v[(i, j - 1)]);
            p[(i, j)] = 0.0;
        }
    }

    enforce(div, BoundaryKind::Scalar);
    enforce(p, BoundaryKind::Scalar);

    relax(p, div, 1.0, 4.0, BoundaryKind::Scalar, iterations);

    for i in 1..=n {
        for j in 1..=n {
            u[(i, j)] -= 0.5 * (p[(i + 1, j)] - p[(i - 1, j)]) / h;
            v[(i, j)] -= 0.5 * (p[(i, j + 1)] - p[(i, j - 1)]) / h;
        }
    }

    enforce(u, BoundaryKind::Horizontal);
    enforce(v, BoundaryKind::Vertical);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics, grid::Grid};

    #[test]
    fn test_zero_field_stays_zero() {
        let grid = Grid::new(8);
        let mut u = Field::zeros(grid);
        let mut v = Field::zeros(grid);
        let mut p = Field::zeros(grid);
        let mut div = Field::zeros(grid);
        p.fill(3.0);
        div.fill(-1.0);

        project(&mut u, &mut v, &mut p, &mut div, 20);

        assert!(u.as_slice().iter().all(|&x| x == 0.0));
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
        assert!(p.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_divergence_free_field_is_untouched() {
        // Velocity from the central-difference curl of a stream function that vanishes near
        // the walls has exactly zero discrete divergence.
        let n = 16;
        let grid = Grid::new(n);
        let mut psi = Field::zeros(grid);
        for i in 4..=12 {
            for j in 4..=12 {
                let x = (i as f32 - 8.0) / 4.0;
                let y = (j as f32 - 8.0) / 4.0;
                psi[(i, j)] = (1.0 - x * x) * (1.0 - y * y) * 0.01;
            }
        }

        let mut u = Field::zeros(grid);
        let mut v = Field::zeros(grid);
        for i in 1..=n {
            for j in 1..=n {
                u[(i, j)] = psi[(i, j + 1)] - psi[(i, j - 1)];
                v[(i, j)] = psi[(i - 1, j)] - psi[(i + 1, j)];
            }
        }
        enforce(&mut u, BoundaryKind::Horizontal);
        enforce(&mut v, BoundaryKind::Vertical);

        let before = (u.clone(), v.clone());
        let mut p = Field::zeros(grid);
        let mut div = Field::zeros(grid);
        project(&mut u, &mut v, &mut p, &mut div, 20);

        assert!(diagnostics::max_divergence(&u, &v) < 1e-3);
        for (a, b) in u.as_slice().iter().zip(before.0.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
        for (a, b) in v.as_slice().iter().zip(before.1.as_slice()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reduces_divergence_of_source() {
        let n = 16;
        let grid = Grid::new(n);
        let mut u = Field::zeros(grid);
        let mut v = Field::zeros(grid);
        // Outward flow from the centre.
        u[(7, 8)] = -1.0;
        u[(9, 8)] = 1.0;
        v[(8, 7)] = -1.0;
        v[(8, 9)] = 1.0;

        let before = diagnostics::rms_divergence(&u, &v);
        let mut p = Field::zeros(grid);
        let mut div = Field::zeros(grid);
        project(&mut u, &mut v, &mut p, &mut div, 20);
        let after = diagnostics::rms_divergence(&u, &v);

        assert!(after < before, "divergence should drop: {before} -> {after}");
    }
}
