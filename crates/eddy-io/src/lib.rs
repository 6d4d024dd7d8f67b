use std::{io::Write, path::{Path, PathBuf}};

use eddy_fluids::{stable::d2::{StableFluid2D, StableFluid2DParams}, Fluid};
use encode::{EncodingError, FluidFrameEncoder};
use glam::Vec2;

pub mod as_bytes;
pub mod decode;
pub mod encode;

/// Leading bytes of every `_meta` file.
pub const MAGIC: [u8; 4] = *b"EDDY";

/// Current version of the recording format.
pub const VERSION: u8 = 1;

/// A field stored in every frame of a recording, in the order of its tags in `_meta`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// One `f32` per cell.
    Density,
    /// One `(u, v)` pair of `f32`s per cell.
    Velocity,
}

impl FieldKind {
    pub fn tag(self) -> u8 {
        match self {
            FieldKind::Density => 0,
            FieldKind::Velocity => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(FieldKind::Density),
            1 => Some(FieldKind::Velocity),
            _ => None,
        }
    }

    /// Number of `f32`s stored per cell.
    pub fn components(self) -> usize {
        match self {
            FieldKind::Density => 1,
            FieldKind::Velocity => 2,
        }
    }
}

/// A fluid whose state can be written to a recording.
pub trait EncodeFluid: Fluid {
    /// Fields written by [`encode_state`](Self::encode_state), in order.
    const FIELDS: &'static [FieldKind];

    /// Solver parameters stored in the recording's metadata.
    fn solver_params(&self) -> StableFluid2DParams;

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for StableFluid2D {
    const FIELDS: &'static [FieldKind] = &[FieldKind::Density, FieldKind::Velocity];

    fn solver_params(&self) -> StableFluid2DParams {
        *self.params()
    }

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        let cells = self.grid().cell_count();

        encoder.encode_section(cells, self.density().iter().copied())?;
        encoder.encode_section(cells, self.u().iter().zip(self.v()).map(|(&u, &v)| Vec2::new(u, v)))?;

        Ok(())
    }
}

/// Path of the file holding `frame` in a recording of `num_frames` frames. Frame indices are
/// zero-padded to a common width so the files sort in playback order.
pub(crate) fn frame_path(dir: &Path, num_frames: u64, frame: u64) -> PathBuf {
    let width = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) as usize + 1;
    dir.join(format!("{frame:0width$}.dat"))
}
