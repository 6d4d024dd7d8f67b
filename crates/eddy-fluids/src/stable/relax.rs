use crate::grid::Field;

use super::{boundary::enforce, BoundaryKind};

/// Relaxes `x` towards the solution of `x = (x0 + a * Σ neighbours(x)) / c`.
///
/// Performs exactly `iterations` in-place Gauss-Seidel sweeps over the interior, `i` outer and
/// `j` inner, re-enforcing the boundary after each sweep. There is no residual check: the
/// result is an approximation whose accuracy is bounded by `iterations`, and the starting
/// guess is whatever `x` holds on entry.
pub fn relax(x: &mut Field, x0: &Field, a: f32, c: f32, kind: BoundaryKind, iterations: usize) {
    let n = x.grid().resolution();

    for _ in 0..iterations {
        for i in 1..=n {
            for j in 1..=n {
                let neighbours = x[(i - 1, j)] + x[(i + 1, j)] + x[(i, j - 1)] + x[(i, j + 1)];
                x[(i, j)] = (x0[(i, j)] + a * neighbours) / c;
            }
        }

        enforce(x, kind);
    }
}

/// Implicit diffusion of `x0` into `x` at `rate` over a step of `dt`.
///
/// a = dt * rate * n², c = 1 + 4a
pub fn diffuse(x: &mut Field, x0: &Field, rate: f32, dt: f32, kind: BoundaryKind, iterations: usize) {
    let n = x.grid().resolution() as f32;
    let a = dt * rate * n * n;

    relax(x, x0, a, 1.0 + 4.0 * a, kind, iterations);
}
