use crate::{diagnostics::{self, FluidStats}, grid::{Field, FieldPair, Grid}, Fluid};

use super::{advect::advect, project::project, relax::diffuse, BoundaryKind};

/// Two-dimensional stable-fluids simulation on an `n`×`n` grid.
///
/// Owns the horizontal and vertical velocity, the density, and a scratch buffer for each.
/// Forcing accumulates straight into the current fields; the scratch buffers double as
/// per-tick source buffers and are zeroed at the end of every [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct StableFluid2D {
    grid: Grid,
    params: StableFluid2DParams,

    /// Horizontal velocity.
    u: FieldPair,
    /// Vertical velocity.
    v: FieldPair,
    /// Transported scalar density.
    density: FieldPair,

    ticks: u64,
}

impl StableFluid2D {
    /// Creates a simulation with `n` interior cells per axis and the default relaxation
    /// iteration count.
    pub fn new(n: usize, dt: f32, diffusion: f32, viscosity: f32) -> Self {
        Self::with_params(n, StableFluid2DParams {
            dt,
            diffusion,
            viscosity,
            ..Default::default()
        })
    }

    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn with_params(n: usize, params: StableFluid2DParams) -> Self {
        let grid = Grid::new(n);

        log::debug!(
            "allocating {n}x{n} stable fluid ({} cells per field, dt = {}, diffusion = {}, viscosity = {}, {} iterations)",
            grid.cell_count(),
            params.dt,
            params.diffusion,
            params.viscosity,
            params.iterations,
        );

        Self {
            grid,
            params,
            u: FieldPair::zeros(grid),
            v: FieldPair::zeros(grid),
            density: FieldPair::zeros(grid),
            ticks: 0,
        }
    }

    #[inline(always)]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline(always)]
    pub fn params(&self) -> &StableFluid2DParams {
        &self.params
    }

    /// Number of completed ticks.
    #[inline(always)]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current horizontal velocity, in [`Grid::idx`] order.
    pub fn u(&self) -> &[f32] {
        self.u.current.as_slice()
    }

    /// Current vertical velocity, in [`Grid::idx`] order.
    pub fn v(&self) -> &[f32] {
        self.v.current.as_slice()
    }

    /// Current density, in [`Grid::idx`] order.
    pub fn density(&self) -> &[f32] {
        self.density.current.as_slice()
    }

    pub fn velocity_fields(&self) -> (&Field, &Field) {
        (&self.u.current, &self.v.current)
    }

    pub fn density_field(&self) -> &Field {
        &self.density.current
    }

    /// Adds `amount` to the density at interior cell `(x, y)`.
    pub fn add_density(&mut self, x: usize, y: usize, amount: f32) {
        debug_assert!(self.grid.is_interior(x, y), "({x}, {y}) is not an interior cell");
        self.density.current[(x, y)] += amount;
    }

    /// Adds `(dx, dy)` to the velocity at interior cell `(x, y)`.
    pub fn add_velocity(&mut self, x: usize, y: usize, dx: f32, dy: f32) {
        debug_assert!(self.grid.is_interior(x, y), "({x}, {y}) is not an interior cell");
        self.u.current[(x, y)] += dx;
        self.v.current[(x, y)] += dy;
    }

    /// Adds sources, diffuses with the viscosity, projects, self-advects and projects again.
    pub fn velocity_step(&mut self) {
        let StableFluid2DParams { dt, viscosity, iterations, .. } = self.params;
        let Self { u, v, .. } = self;

        u.current.add_scaled(&u.scratch, dt);
        v.current.add_scaled(&v.scratch, dt);

        u.swap();
        diffuse(&mut u.current, &u.scratch, viscosity, dt, BoundaryKind::Horizontal, iterations);
        v.swap();
        diffuse(&mut v.current, &v.scratch, viscosity, dt, BoundaryKind::Vertical, iterations);
        project(&mut u.current, &mut v.current, &mut u.scratch, &mut v.scratch, iterations);

        u.swap();
        v.swap();
        advect(&mut u.current, &u.scratch, &u.scratch, &v.scratch, dt, BoundaryKind::Horizontal);
        advect(&mut v.current, &v.scratch, &u.scratch, &v.scratch, dt, BoundaryKind::Vertical);
        project(&mut u.current, &mut v.current, &mut u.scratch, &mut v.scratch, iterations);
    }

    /// Adds the source, diffuses, then advects along the current velocity.
    pub fn density_step(&mut self) {
        let StableFluid2DParams { dt, diffusion, iterations, .. } = self.params;
        let Self { u, v, density, .. } = self;

        density.current.add_scaled(&density.scratch, dt);

        density.swap();
        diffuse(&mut density.current, &density.scratch, diffusion, dt, BoundaryKind::Scalar, iterations);

        density.swap();
        advect(&mut density.current, &density.scratch, &u.current, &v.current, dt, BoundaryKind::Scalar);
    }

    /// Advances the simulation by one `dt` and clears the source buffers.
    pub fn tick(&mut self) {
        self.velocity_step();
        self.density_step();

        self.u.scratch.fill(0.0);
        self.v.scratch.fill(0.0);
        self.density.scratch.fill(0.0);

        self.ticks += 1;
    }

    /// Zeroes every field without reallocating.
    pub fn clear(&mut self) {
        for pair in [&mut self.u, &mut self.v, &mut self.density] {
            pair.current.fill(0.0);
            pair.scratch.fill(0.0);
        }
    }

    pub fn stats(&self) -> FluidStats {
        let (u, v) = self.velocity_fields();

        FluidStats {
            ticks: self.ticks,
            total_density: diagnostics::total(self.density_field()),
            kinetic_energy: diagnostics::kinetic_energy(u, v),
            max_divergence: diagnostics::max_divergence(u, v),
            finite: diagnostics::is_finite(u) && diagnostics::is_finite(v) && diagnostics::is_finite(self.density_field()),
        }
    }

    /// Source buffers, exposed to tests of the add-source stage.
    #[cfg(test)]
    pub(crate) fn sources_mut(&mut self) -> (&mut Field, &mut Field, &mut Field) {
        (&mut self.u.scratch, &mut self.v.scratch, &mut self.density.scratch)
    }
}

/// Parameters fixed at creation of a [`StableFluid2D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableFluid2DParams {
    /// Time step of a single tick.
    pub dt: f32,
    /// Diffusion rate of the density.
    pub diffusion: f32,
    /// Kinematic viscosity of the velocity.
    pub viscosity: f32,
    /// Relaxation sweeps per diffusion or pressure solve. The solves are approximate; more
    /// sweeps trade time for accuracy.
    pub iterations: usize,
}

impl Default for StableFluid2DParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            diffusion: 0.0,
            viscosity: 0.0,
            iterations: 20,
        }
    }
}

impl Fluid for StableFluid2D {
    fn resolution(&self) -> usize {
        self.grid.resolution()
    }

    fn add_density(&mut self, x: usize, y: usize, amount: f32) {
        StableFluid2D::add_density(self, x, y, amount);
    }

    fn add_velocity(&mut self, x: usize, y: usize, dx: f32, dy: f32) {
        StableFluid2D::add_velocity(self, x, y, dx, dy);
    }

    fn tick(&mut self) {
        StableFluid2D::tick(self);
    }
}
