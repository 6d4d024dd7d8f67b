use crate::{emitter::{Emitter, EmitterId, EmitterSet}, Fluid};

pub struct Scene<F> {
    /// The fluid for this scene.
    pub fluid: F,
    /// The emitters forcing the fluid every frame.
    emitters: EmitterSet,
    /// The number of emitters ever added (used for IDs).
    n_emitters: usize,
    /// Frames stepped so far.
    frame: u64,
}

impl<F: Fluid> Scene<F> {
    #[inline(always)]
    pub fn new(fluid: F) -> Self {
        Self {
            fluid,
            emitters: EmitterSet::default(),
            n_emitters: 0,
            frame: 0,
        }
    }

    #[inline(always)]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline(always)]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Adds an emitter to the set, returning its ID.
    pub fn add_emitter<T: Emitter + 'static>(&mut self, emitter: T) -> EmitterId {
        let i = self.n_emitters;
        self.n_emitters += 1;

        self.emitters.emitters.insert(i, Box::new(emitter));
        log::debug!("added emitter {i}");
        EmitterId(i)
    }

    /// Removes an emitter from the set, given its ID.
    pub fn remove_emitter(&mut self, id: EmitterId) -> Option<Box<dyn Emitter>> {
        self.emitters.emitters.remove(&id.0)
    }

    /// Insert an emitter into the set at the given ID, overriding and returning the old value if
    /// it was previously in the set.
    pub fn insert_emitter<T: Emitter + 'static>(&mut self, id: EmitterId, emitter: T) -> Option<Box<dyn Emitter>> {
        self.emitters.emitters.insert(id.0, Box::new(emitter))
    }

    /// Applies every emitter, then ticks the fluid once.
    pub fn step(&mut self) {
        self.emitters.emit(self.frame, &mut self.fluid);
        self.fluid.tick();
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::{emitter::jet::Jet, stable::d2::StableFluid2D};

    use super::*;

    #[test]
    fn test_step_applies_emitters_then_ticks() {
        let mut scene = Scene::new(StableFluid2D::new(4, 0.1, 0.0, 0.0));
        scene.add_emitter(Jet::new(Vec2::new(0.3, 0.3), 100.0, Vec2::ZERO));

        scene.step();

        assert_eq!(scene.frame(), 1);
        assert_eq!(scene.fluid.ticks(), 1);
        assert_eq!(scene.fluid.density()[scene.fluid.grid().idx(2, 2)], 100.0);
    }

    #[test]
    fn test_emitter_ids() {
        let mut scene = Scene::new(StableFluid2D::new(4, 0.1, 0.0, 0.0));
        let a = scene.add_emitter(Jet::new(Vec2::ZERO, 1.0, Vec2::ZERO));
        let b = scene.add_emitter(Jet::new(Vec2::ONE, 1.0, Vec2::ZERO));
        assert_ne!(a, b);
        assert_eq!(scene.emitter_count(), 2);

        assert!(scene.remove_emitter(a).is_some());
        assert!(scene.remove_emitter(a).is_none());
        assert!(scene.insert_emitter(b, Jet::new(Vec2::splat(0.5), 2.0, Vec2::ZERO)).is_some());
        assert!(scene.insert_emitter(a, Jet::new(Vec2::splat(0.5), 2.0, Vec2::ZERO)).is_none());
        assert_eq!(scene.emitter_count(), 2);

        let c = scene.add_emitter(Jet::new(Vec2::ZERO, 1.0, Vec2::ZERO));
        assert_eq!(c, EmitterId(2));
    }

    #[test]
    fn test_inactive_emitter_adds_nothing() {
        let mut scene = Scene::new(StableFluid2D::new(4, 0.1, 0.0, 0.0));
        scene.add_emitter(Jet::new(Vec2::splat(0.5), 5.0, Vec2::ZERO).active(1, Some(2)));

        scene.step();
        assert_eq!(scene.fluid.stats().total_density, 0.0);

        scene.step();
        assert!(scene.fluid.stats().total_density > 0.0);

        let after_second = scene.fluid.stats().total_density;
        scene.step();
        assert_eq!(scene.fluid.stats().total_density, after_second);
    }
}
