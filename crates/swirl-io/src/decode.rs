use std::{fs::File, io::{BufReader, Read}, path::PathBuf};

use glam::Vec2;
use thiserror::Error;

use swirl_fluids::grid::Grid;

use super::{as_bytes::AsBytes, encode::frame_path};

/// Reads back a recording written by [`FluidDataEncoder`](crate::encode::FluidDataEncoder).
pub struct FluidDataDecoder {
    /// The path to the directory in which the fluid data resides.
    path: PathBuf,
    size: usize,
    num_frames: u64,
    current_frame: u64,
}

impl FluidDataDecoder {
    pub fn new(path: PathBuf) -> FluidDataDecoder {
        Self {
            path,
            size: 0,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0u8; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn read_values<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R, count: usize) -> Result<Vec<T>, DecodingError> {
        let mut bytes = vec![0u8; N * count];
        reader.read_exact(&mut bytes)?;

        Ok(bytes.chunks_exact(N).map(|chunk| {
            let mut b = [0; N];
            b.copy_from_slice(chunk);
            T::from_bytes(b)
        }).collect())
    }

    /// Reads a section header and checks it holds one value per cell.
    fn read_section_len<R: Read>(&self, reader: &mut R) -> Result<usize, DecodingError> {
        let expected = self.size * self.size;
        let len = Self::read_value::<8, u64, _>(reader)?;

        if len != expected as u64 {
            return Err(DecodingError::SectionLength { expected, found: len });
        }

        Ok(expected)
    }

    pub fn decode_metadata(&mut self) -> Result<FluidMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let size = Self::read_value::<4, u32, _>(&mut reader)?;
        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;
        let dt = Self::read_value::<4, f32, _>(&mut reader)?;
        let diffusion = Self::read_value::<4, f32, _>(&mut reader)?;
        let viscosity = Self::read_value::<4, f32, _>(&mut reader)?;

        self.size = size as usize;
        self.num_frames = num_frames;
        self.current_frame = 0;

        Ok(FluidMetadata {
            size,
            fps,
            num_frames,
            dt,
            diffusion,
            viscosity,
        })
    }

    /// Reads the next frame, or `None` once every frame has been read.
    pub fn decode_frame(&mut self) -> Result<Option<FluidFrameData>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None)
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let mut reader = BufReader::new(File::open(path)?);

        let n = self.read_section_len(&mut reader)?;
        let density = Self::read_values::<4, f32, _>(&mut reader, n)?;

        let n = self.read_section_len(&mut reader)?;
        let velocity = Self::read_values::<8, Vec2, _>(&mut reader, n)?;
        let (vx, vy): (Vec<f32>, Vec<f32>) = velocity.into_iter().map(|v| (v.x, v.y)).unzip();

        self.current_frame += 1;

        Ok(Some(FluidFrameData {
            density: self.grid(density)?,
            velocity_x: self.grid(vx)?,
            velocity_y: self.grid(vy)?,
        }))
    }

    fn grid(&self, cells: Vec<f32>) -> Result<Grid, DecodingError> {
        let found = cells.len() as u64;
        Grid::from_cells(self.size, cells)
            .ok_or(DecodingError::SectionLength { expected: self.size * self.size, found })
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidMetadata {
    /// Edge length of the grid, in cells.
    pub size: u32,
    pub fps: u32,
    pub num_frames: u64,
    pub dt: f32,
    pub diffusion: f32,
    pub viscosity: f32,
}

#[derive(Debug, Clone)]
pub struct FluidFrameData {
    pub density: Grid,
    pub velocity_x: Grid,
    pub velocity_y: Grid,
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("section holds {found} values, expected {expected}")]
    SectionLength {
        expected: usize,
        found: u64,
    },
}
