use ndarray::{azip, Array2};

use crate::grid::Field;

/// Snapshot of whole-field quantities of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidStats {
    pub ticks: u64,
    /// Sum of the interior density.
    pub total_density: f64,
    /// `0.5 * Σ(u² + v²)` over the interior.
    pub kinetic_energy: f64,
    /// Largest interior divergence magnitude, see [`divergence`].
    pub max_divergence: f64,
    /// Whether every stored value of every field is finite.
    pub finite: bool,
}

/// Central-difference divergence of `(u, v)` on the interior cells, in grid units of `1/n`.
///
/// `div[i, j] = 0.5 * n * (u[i+1, j] - u[i-1, j] + v[i, j+1] - v[i, j-1])`, returned with the
/// interior cell `(i, j)` at `(i - 1, j - 1)`.
pub fn divergence(u: &Field, v: &Field) -> Array2<f64> {
    let n = u.grid().resolution();
    let scale = 0.5 * n as f64;

    Array2::from_shape_fn((n, n), |(a, b)| {
        let (i, j) = (a + 1, b + 1);
        let du = u[(i + 1, j)] as f64 - u[(i - 1, j)] as f64;
        let dv = v[(i, j + 1)] as f64 - v[(i, j - 1)] as f64;
        scale * (du + dv)
    })
}

pub fn max_divergence(u: &Field, v: &Field) -> f64 {
    divergence(u, v).iter().fold(0.0, |m, d| f64::max(m, d.abs()))
}

/// Root mean square of [`divergence`] over the interior.
pub fn rms_divergence(u: &Field, v: &Field) -> f64 {
    let div = divergence(u, v);
    (div.iter().map(|d| d * d).sum::<f64>() / div.len() as f64).sqrt()
}

/// Sum of the interior cells of `x`.
pub fn total(x: &Field) -> f64 {
    x.interior().iter().map(|&v| v as f64).sum()
}

pub fn kinetic_energy(u: &Field, v: &Field) -> f64 {
    let mut sum = 0.0;

    azip!((&a in &u.interior(), &b in &v.interior()) {
        sum += (a as f64) * (a as f64) + (b as f64) * (b as f64);
    });

    0.5 * sum
}

pub fn is_finite(x: &Field) -> bool {
    x.as_slice().iter().all(|v| v.is_finite())
}
