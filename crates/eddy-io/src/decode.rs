use std::{fs::File, io::{self, BufReader, Read}, path::PathBuf};

use eddy_fluids::stable::d2::StableFluid2DParams;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{as_bytes::AsBytes, frame_path, FieldKind, MAGIC, VERSION};

pub struct FluidDataDecoder {
    /// The path to the directory into which the fluid data resides.
    path: PathBuf,
    fields: SmallVec<[FieldKind; 4]>,
    cell_count: usize,
    num_frames: u64,
    current_frame: u64,
}

impl FluidDataDecoder {
    pub fn new(path: PathBuf) -> FluidDataDecoder {
        Self {
            path,
            fields: SmallVec::new(),
            cell_count: 0,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    /// Reads `count` values. The buffer grows with the bytes actually present, so a corrupt
    /// count fails on the short read instead of allocating up front.
    fn read_values<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R, count: usize) -> Result<Vec<T>, DecodingError> {
        let len = count.checked_mul(N).ok_or(DecodingError::SectionTooLarge(count as u64))?;
        let mut bytes = Vec::new();
        reader.take(len as u64).read_to_end(&mut bytes)?;

        if bytes.len() != len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        Ok(bytes.chunks_exact(N).map(|b| T::from_bytes(std::array::from_fn(|k| b[k]))).collect())
    }

    /// Reads `_meta`. Must be called before any frame is decoded.
    pub fn decode_metadata(&mut self) -> Result<FluidMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(DecodingError::BadMagic(magic));
        }

        let version = Self::read_value::<1, u8, _>(&mut reader)?;
        if version != VERSION {
            return Err(DecodingError::UnsupportedVersion(version));
        }

        let resolution = Self::read_value::<4, u32, _>(&mut reader)?;
        if resolution == 0 {
            return Err(DecodingError::ZeroResolution);
        }

        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;

        let params = StableFluid2DParams {
            dt: Self::read_value::<4, f32, _>(&mut reader)?,
            diffusion: Self::read_value::<4, f32, _>(&mut reader)?,
            viscosity: Self::read_value::<4, f32, _>(&mut reader)?,
            iterations: Self::read_value::<4, u32, _>(&mut reader)? as usize,
        };

        let n_fields = Self::read_value::<1, u8, _>(&mut reader)?;
        let mut fields: SmallVec<[_; 4]> = SmallVec::new();

        for _ in 0..n_fields {
            let tag = Self::read_value::<1, u8, _>(&mut reader)?;
            fields.push(FieldKind::from_tag(tag).ok_or(DecodingError::UnknownField(tag))?);
        }

        let stride = resolution as u64 + 2;
        self.cell_count = stride
            .checked_mul(stride)
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(DecodingError::SectionTooLarge(stride))?;
        self.fields = fields.clone();
        self.num_frames = num_frames;
        self.current_frame = 0;

        Ok(FluidMetadata {
            version,
            resolution,
            fps,
            num_frames,
            params,
            fields,
        })
    }

    /// Reads the next frame, or `None` once every frame has been read.
    pub fn decode_frame(&mut self) -> Result<Option<FluidFrameData>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let mut reader = BufReader::new(File::open(path)?);
        let mut sections = SmallVec::new();

        for &kind in &self.fields {
            let len = Self::read_value::<8, u64, _>(&mut reader)?;
            if len != self.cell_count as u64 {
                return Err(DecodingError::ResolutionMismatch {
                    field: kind,
                    expected: self.cell_count as u64,
                    found: len,
                });
            }

            let count = self.cell_count
                .checked_mul(kind.components())
                .ok_or(DecodingError::SectionTooLarge(len))?;
            let values = Self::read_values::<4, f32, _>(&mut reader, count)?;
            sections.push((kind, FluidDataArray(values)));
        }

        self.current_frame += 1;

        Ok(Some(FluidFrameData { sections }))
    }

    /// Rewinds to the first frame.
    pub fn reset(&mut self) {
        self.current_frame = 0;
    }

    /// Reads the metadata and every frame of the recording.
    pub fn decode_all(&mut self) -> Result<FluidData, DecodingError> {
        let metadata = self.decode_metadata()?;
        let mut frames = Vec::new();

        while let Some(frame) = self.decode_frame()? {
            frames.push(frame);
        }

        log::info!("decoded {} frames from {}", frames.len(), self.path.display());

        Ok(FluidData { metadata, frames })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FluidMetadata {
    pub version: u8,
    pub resolution: u32,
    pub fps: u32,
    pub num_frames: u64,
    pub params: StableFluid2DParams,
    pub fields: SmallVec<[FieldKind; 4]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FluidFrameData {
    sections: SmallVec<[(FieldKind, FluidDataArray); 2]>,
}

impl FluidFrameData {
    pub fn field(&self, kind: FieldKind) -> Option<&FluidDataArray> {
        self.sections.iter().find(|(k, _)| *k == kind).map(|(_, data)| data)
    }

    pub fn density(&self) -> Option<&FluidDataArray> {
        self.field(FieldKind::Density)
    }

    pub fn velocity(&self) -> Option<&FluidDataArray> {
        self.field(FieldKind::Velocity)
    }
}

/// A decoded field, flat in storage order.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidDataArray(Vec<f32>);

impl FluidDataArray {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Iterates over groups of `D` consecutive values, one group per cell.
    pub fn iter<const D: usize>(&self) -> impl Iterator<Item = [f32; D]> + use<'_, D> {
        self.0.chunks_exact(D).map(|chunk| std::array::from_fn(|k| chunk[k]))
    }

    pub fn get<const D: usize>(&self, i: usize) -> [f32; D] {
        std::array::from_fn(|k| self.0[D * i + k])
    }
}

/// A whole recording held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidData {
    pub metadata: FluidMetadata,
    pub frames: Vec<FluidFrameData>,
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("not a fluid recording (magic {0:?})")]
    BadMagic([u8; 4]),
    #[error("unsupported recording version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown field tag {0}")]
    UnknownField(u8),
    #[error("section of {0} cells does not fit in memory")]
    SectionTooLarge(u64),
    #[error("recording has zero resolution")]
    ZeroResolution,
    #[error("{field:?} section holds {found} cells, expected {expected}")]
    ResolutionMismatch {
        field: FieldKind,
        expected: u64,
        found: u64,
    },
}
