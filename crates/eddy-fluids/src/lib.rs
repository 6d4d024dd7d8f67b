pub mod diagnostics;
pub mod emitter;
pub mod grid;
pub mod scene;
pub mod stable;

/// A grid fluid that can be forced and stepped by a [`scene::Scene`].
pub trait Fluid {
    /// Number of interior cells along each axis.
    fn resolution(&self) -> usize;

    /// Accumulates `amount` into the density at interior cell `(x, y)`.
    fn add_density(&mut self, x: usize, y: usize, amount: f32);

    /// Accumulates `(dx, dy)` into the velocity at interior cell `(x, y)`.
    fn add_velocity(&mut self, x: usize, y: usize, dx: f32, dy: f32);

    /// Advances the fluid by one time step.
    fn tick(&mut self);
}
