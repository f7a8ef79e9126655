use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use thiserror::Error;

use swirl_fluids::{scene::Scene, Fluid};

use crate::EncodeFluid;

use super::as_bytes::AsBytes;

/// Writes a recording: a `_meta` file plus one numbered `.dat` file per frame.
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

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    fn frame_path(&self, frame: u64) -> PathBuf {
        frame_path(&self.path, self.num_frames, frame)
    }

    pub fn encode_metadata<F, P>(&mut self, scene: &Scene<F, P>) -> Result<(), EncodingError>
    where
        F: EncodeFluid + Fluid<Params = P>,
    {
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);

        writer.write_all(&(scene.size() as u32).to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;

        for constant in scene.fluid.constants() {
            writer.write_all(&constant.to_bytes())?;
        }

        writer.flush()?;

        Ok(())
    }

    pub fn encode_frame<F, P>(&mut self, scene: &Scene<F, P>) -> Result<(), EncodingError>
    where
        F: EncodeFluid + Fluid<Params = P>,
    {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        let path = self.frame_path(self.current_frame);
        let mut encoder = FluidFrameEncoder { writer: BufWriter::new(File::create(path)?) };

        scene.fluid.encode_state(&mut encoder)?;
        encoder.writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }
}

/// `<dir>/<frame>.dat`, zero-padded to the width of the last frame number.
pub(crate) fn frame_path(dir: &std::path::Path, num_frames: u64, frame: u64) -> PathBuf {
    let max_digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) + 1;
    let digits = frame.checked_ilog10().unwrap_or(0) + 1;
    let zeros = max_digits.saturating_sub(digits);

    dir.join(format!("{}{frame}.dat", "0".repeat(zeros as usize)))
}

pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    /// Writes `len` followed by `len` values.
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
    #[error("recording only has room for {0} frames")]
    TooManyFrames(u64),
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_frame_paths_are_zero_padded() {
        let dir = Path::new("out");
        assert_eq!(frame_path(dir, 1000, 7), dir.join("007.dat"));
        assert_eq!(frame_path(dir, 1000, 999), dir.join("999.dat"));
        assert_eq!(frame_path(dir, 10, 0), dir.join("0.dat"));
        assert_eq!(frame_path(dir, 11, 0), dir.join("00.dat"));
        assert_eq!(frame_path(dir, 0, 0), dir.join("0.dat"));
    }
}
