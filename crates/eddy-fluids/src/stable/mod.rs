//! "Stable fluids" solver: implicit diffusion, semi-Lagrangian advection and an iterative
//! pressure projection on a collocated grid with a one-cell ghost border.

pub mod advect;
pub mod boundary;
pub mod d2;
pub mod project;
pub mod relax;

/// Ghost-cell rule of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Zero-gradient: ghosts copy their interior neighbour on every edge.
    Scalar,
    /// Horizontal velocity: negated on the left and right edges.
    Horizontal,
    /// Vertical velocity: negated on the bottom and top edges.
    Vertical,
}
