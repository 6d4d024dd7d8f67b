use crate::grid::Field;

use super::BoundaryKind;

/// Fills the ghost border of `x` from its interior.
///
/// Edge ghosts copy the adjacent interior cell, negated when `x` is the velocity component
/// normal to that edge so the flow through the wall cancels. Each corner ghost is the average
/// of its two neighbouring edge ghosts.
pub fn enforce(x: &mut Field, kind: BoundaryKind) {
    let n = x.grid().resolution();
    let sx = if kind == BoundaryKind::Horizontal { -1.0 } else { 1.0 };
    let sy = if kind == BoundaryKind::Vertical { -1.0 } else { 1.0 };

    for k in 1..=n {
        x[(0, k)] = sx * x[(1, k)];
        x[(n + 1, k)] = sx * x[(n, k)];
        x[(k, 0)] = sy * x[(k, 1)];
        x[(k, n + 1)] = sy * x[(k, n)];
    }

    x[(0, 0)] = 0.5 * (x[(1, 0)] + x[(0, 1)]);
    x[(0, n + 1)] = 0.5 * (x[(1, n + 1)] + x[(0, n)]);
    x[(n + 1, 0)] = 0.5 * (x[(n, 0)] + x[(n + 1, 1)]);
    x[(n + 1, n + 1)] = 0.5 * (x[(n, n + 1)] + x[(n + 1, n)]);
}
