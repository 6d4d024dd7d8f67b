use std::collections::BTreeMap;

use crate::Fluid;

pub mod jet;

/// A source of forcing that is applied to a fluid once per frame.
pub trait Emitter: Send + Sync {
    fn emit(&self, frame: u64, fluid: &mut dyn Fluid);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmitterId(pub usize);

/// Emitters keyed by id. Emission runs in id order so a frame's forcing is always accumulated
/// in the same order.
#[derive(Default)]
pub struct EmitterSet {
    pub emitters: BTreeMap<usize, Box<dyn Emitter>>,
}

impl EmitterSet {
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

impl Emitter for EmitterSet {
    fn emit(&self, frame: u64, fluid: &mut dyn Fluid) {
        for emitter in self.emitters.values() {
            emitter.emit(frame, fluid);
        }
    }
}
