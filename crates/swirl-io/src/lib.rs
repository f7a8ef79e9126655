use std::io::Write;

use encode::{EncodingError, FluidFrameEncoder};
use glam::Vec2;
use swirl_fluids::{stable::StableFluid2D, Fluid};

pub mod as_bytes;
pub mod decode;
pub mod encode;

/// A fluid whose state can be recorded frame by frame.
pub trait EncodeFluid: Fluid {
    /// Time step, diffusion and viscosity, stored once in the metadata.
    fn constants(&self) -> [f32; 3];

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for StableFluid2D {
    fn constants(&self) -> [f32; 3] {
        [self.dt(), self.diffusion(), self.viscosity()]
    }

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        let density = self.density().as_slice();
        let vx = self.velocity_x().as_slice();
        let vy = self.velocity_y().as_slice();

        encoder.encode_section(density.len(), density.iter().copied())?;
        encoder.encode_section(vx.len(), vx.iter().zip(vy).map(|(&x, &y)| Vec2::new(x, y)))?;

        Ok(())
    }
}
