use error::FluidError;

pub mod boundary;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod scene;
pub mod solver;
pub mod source;
pub mod stable;

pub trait Fluid {
    type Params;

    /// Edge length of the square grid, in cells.
    fn size(&self) -> usize;

    fn add_density(&mut self, x: usize, y: usize, amount: f32) -> Result<(), FluidError>;

    fn add_velocity(&mut self, x: usize, y: usize, amount_x: f32, amount_y: f32) -> Result<(), FluidError>;

    /// Advances the fluid by one time step.
    fn step(&mut self, params: &Self::Params);
}
