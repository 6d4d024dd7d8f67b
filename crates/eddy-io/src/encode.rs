use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use thiserror::Error;

use eddy_fluids::scene::Scene;

use crate::{frame_path, EncodeFluid, MAGIC, VERSION};

use super::as_bytes::AsBytes;

pub struct FluidDataEncoder {
    /// The path to the directory into which the fluid data will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    current_frame: u64,
}

impl FluidDataEncoder {
    /// Creates the recording directory. Fails if it already exists.
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<FluidDataEncoder, EncodingError> {
        std::fs::create_dir(&path)?;
        log::info!("recording {num_frames} frames at {fps} fps to {}", path.display());

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    #[inline(always)]
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn encode_metadata<F: EncodeFluid>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError> {
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);
        let params = scene.fluid.solver_params();
        let resolution = u32::try_from(scene.fluid.resolution())
            .map_err(|_| EncodingError::ResolutionOverflow(scene.fluid.resolution()))?;

        writer.write_all(&MAGIC)?;
        writer.write_all(&VERSION.to_bytes())?;
        writer.write_all(&resolution.to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;

        writer.write_all(&params.dt.to_bytes())?;
        writer.write_all(&params.diffusion.to_bytes())?;
        writer.write_all(&params.viscosity.to_bytes())?;
        writer.write_all(&(params.iterations as u32).to_bytes())?;

        writer.write_all(&(F::FIELDS.len() as u8).to_bytes())?;
        for field in F::FIELDS {
            writer.write_all(&field.tag().to_bytes())?;
        }

        writer.flush()?;
        log::debug!("wrote metadata for a {resolution}x{resolution} fluid");

        Ok(())
    }

    pub fn encode_frame<F: EncodeFluid>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError> {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::FrameOverflow(self.num_frames));
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let writer = BufWriter::new(File::create(path)?);

        let mut encoder = FluidFrameEncoder { writer };
        scene.fluid.encode_state(&mut encoder)?;
        encoder.writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }
}

pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    /// Writes `len` followed by every value of `values`.
    pub fn encode_section<const N: usize, T, I>(&mut self, len: usize, values: I) -> Result<(), EncodingError>
    where
        I: Iterator<Item = T>,
        T: AsBytes<N>,
    {
        self.writer.write_all(&(len as u64).to_bytes())?;

        let bytes: Vec<_> = values.flat_map(|v| v.to_bytes()).collect();
        self.writer.write_all(&bytes)?;

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording already holds all {0} frames")]
    FrameOverflow(u64),
    #[error("resolution {0} does not fit the recording format")]
    ResolutionOverflow(usize),
}
