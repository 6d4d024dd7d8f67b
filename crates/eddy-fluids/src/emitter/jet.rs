use glam::Vec2;

use crate::{grid::grid_cell, Fluid};

use super::Emitter;

/// Injects density and a velocity impulse into a square patch of cells every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet {
    /// Centre of the patch in the unit square, `(0, 0)` being the bottom-left of the domain.
    pub position: Vec2,
    /// Density added to each cell per frame.
    pub density: f32,
    /// Velocity added to each cell per frame.
    pub velocity: Vec2,
    /// Half-width of the patch in cells. `0` is a single cell.
    pub radius: u32,
    /// First active frame.
    pub start: u64,
    /// First inactive frame after `start`, if the jet ever stops.
    pub end: Option<u64>,
}

impl Jet {
    pub fn new(position: Vec2, density: f32, velocity: Vec2) -> Self {
        Jet {
            position,
            density,
            velocity,
            radius: 0,
            start: 0,
            end: None,
        }
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Restricts the jet to frames in `start..end`.
    pub fn active(mut self, start: u64, end: Option<u64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn is_active(&self, frame: u64) -> bool {
        frame >= self.start && self.end.map_or(true, |end| frame < end)
    }
}

impl Emitter for Jet {
    fn emit(&self, frame: u64, fluid: &mut dyn Fluid) {
        if !self.is_active(frame) {
            return;
        }

        let n = fluid.resolution();
        let c = grid_cell(self.position, n);
        let r = self.radius as usize;

        let (cx, cy) = (c.x as usize, c.y as usize);
        let (x0, x1) = (cx.saturating_sub(r).max(1), (cx + r).min(n));
        let (y0, y1) = (cy.saturating_sub(r).max(1), (cy + r).min(n));

        for x in x0..=x1 {
            for y in y0..=y1 {
                fluid.add_density(x, y, self.density);
                fluid.add_velocity(x, y, self.velocity.x, self.velocity.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::stable::d2::StableFluid2D;

    use super::*;

    #[test]
    fn test_single_cell() {
        let mut fluid = StableFluid2D::new(4, 0.1, 0.0, 0.0);
        let jet = Jet::new(Vec2::new(0.3, 0.6), 2.0, Vec2::new(1.0, -1.0));

        jet.emit(0, &mut fluid);
        jet.emit(1, &mut fluid);

        let k = fluid.grid().idx(2, 3);
        assert_eq!(fluid.density()[k], 4.0);
        assert_eq!(fluid.u()[k], 2.0);
        assert_eq!(fluid.v()[k], -2.0);
        assert_eq!(fluid.density().iter().sum::<f32>(), 4.0);
    }

    #[test]
    fn test_patch_is_clipped_to_interior() {
        let mut fluid = StableFluid2D::new(4, 0.1, 0.0, 0.0);
        let jet = Jet::new(Vec2::ZERO, 1.0, Vec2::ZERO).with_radius(1);

        jet.emit(0, &mut fluid);

        // Centre (1, 1) with radius 1 covers (1..=2, 1..=2) once clipped.
        assert_eq!(fluid.density().iter().sum::<f32>(), 4.0);
        assert_eq!(fluid.density()[fluid.grid().idx(2, 2)], 1.0);
        assert_eq!(fluid.density()[fluid.grid().idx(0, 0)], 0.0);
    }

    #[test]
    fn test_active_window() {
        let jet = Jet::new(Vec2::splat(0.5), 1.0, Vec2::ZERO).active(2, Some(4));

        assert!(!jet.is_active(1));
        assert!(jet.is_active(2));
        assert!(jet.is_active(3));
        assert!(!jet.is_active(4));
        assert!(Jet::new(Vec2::ZERO, 0.0, Vec2::ZERO).is_active(u64::MAX));
    }
}
