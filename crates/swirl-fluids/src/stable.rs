use glam::Vec2;
use log::debug;

use crate::{
    boundary::Boundary,
    error::FluidError,
    grid::Grid,
    solver::{advect, diffuse, project},
    Fluid,
};

/// Grid size used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: usize = 128;

/// A square grid fluid stepped with Stam's stable-fluids scheme.
///
/// Each field has a current grid and a scratch grid. The scratch grids carry no history: a step
/// overwrites them before reading them, so only `density`, `velocity_x` and `velocity_y` are
/// exposed.
#[derive(Debug, Clone)]
pub struct StableFluid2D {
    /// Edge length of the grid, in cells.
    size: usize,
    /// Time step, in seconds.
    dt: f32,
    /// How fast density spreads out.
    diffusion: f32,
    /// How fast velocity spreads out.
    viscosity: f32,

    /// Dye density.
    density: Grid,
    /// Diffused density, the source that density is advected from.
    density_prev: Grid,
    /// Velocity in the X direction.
    velocity_x: Grid,
    /// Velocity in the Y direction.
    velocity_y: Grid,
    /// Diffused velocity and advection source; pressure while the final projection runs.
    velocity_x0: Grid,
    /// Diffused velocity and advection source; divergence while the final projection runs.
    velocity_y0: Grid,
}

impl StableFluid2D {
    pub fn new(size: usize, diffusion: f32, viscosity: f32, dt: f32) -> Result<Self, FluidError> {
        if size < 3 {
            return Err(FluidError::InvalidParameter { name: "grid size", value: size as f64 });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(FluidError::InvalidParameter { name: "dt", value: dt as f64 });
        }
        // Non-negative rates keep the diffusion coefficient `1 + 6a` at or above one.
        if !diffusion.is_finite() || diffusion < 0.0 {
            return Err(FluidError::InvalidParameter { name: "diffusion", value: diffusion as f64 });
        }
        if !viscosity.is_finite() || viscosity < 0.0 {
            return Err(FluidError::InvalidParameter { name: "viscosity", value: viscosity as f64 });
        }

        debug!("new {size}x{size} fluid: diffusion={diffusion} viscosity={viscosity} dt={dt}");

        Ok(Self {
            size,
            dt,
            diffusion,
            viscosity,
            density: Grid::new(size),
            density_prev: Grid::new(size),
            velocity_x: Grid::new(size),
            velocity_y: Grid::new(size),
            velocity_x0: Grid::new(size),
            velocity_y0: Grid::new(size),
        })
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    #[inline]
    pub fn diffusion(&self) -> f32 {
        self.diffusion
    }

    #[inline]
    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    pub fn density(&self) -> &Grid {
        &self.density
    }

    pub fn velocity_x(&self) -> &Grid {
        &self.velocity_x
    }

    pub fn velocity_y(&self) -> &Grid {
        &self.velocity_y
    }

    /// Velocity of the cell at `(x, y)`, or `None` outside the grid.
    pub fn velocity(&self, x: usize, y: usize) -> Option<Vec2> {
        Some(Vec2::new(
            self.velocity_x.try_get(x, y)?,
            self.velocity_y.try_get(x, y)?,
        ))
    }

    /// Bilinearly interpolated density at a continuous cell position.
    pub fn sample_density(&self, p: Vec2) -> f32 {
        self.density.sample(p)
    }

    /// Zeroes every field, as if freshly created.
    pub fn clear(&mut self) {
        for grid in [
            &mut self.density,
            &mut self.density_prev,
            &mut self.velocity_x,
            &mut self.velocity_y,
            &mut self.velocity_x0,
            &mut self.velocity_y0,
        ] {
            grid.fill(0.0);
        }
    }

    fn check_cell(&self, x: usize, y: usize) -> Result<(), FluidError> {
        if self.density.contains(x, y) {
            Ok(())
        } else {
            Err(FluidError::OutOfRange { x, y, size: self.size })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableFluid2DParams {
    /// Gauss-Seidel sweeps per diffusion and projection solve.
    pub iterations: usize,
}

impl Default for StableFluid2DParams {
    fn default() -> Self {
        Self {
            iterations: 4,
        }
    }
}

impl Fluid for StableFluid2D {
    type Params = StableFluid2DParams;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn add_density(&mut self, x: usize, y: usize, amount: f32) -> Result<(), FluidError> {
        self.check_cell(x, y)?;
        self.density[(x, y)] += amount;
        Ok(())
    }

    fn add_velocity(&mut self, x: usize, y: usize, amount_x: f32, amount_y: f32) -> Result<(), FluidError> {
        self.check_cell(x, y)?;
        self.velocity_x[(x, y)] += amount_x;
        self.velocity_y[(x, y)] += amount_y;
        Ok(())
    }

    fn step(&mut self, params: &Self::Params) {
        let iters = params.iterations;
        let dt = self.dt;

        // Diffuse velocity into the scratch grids.
        diffuse(Boundary::MirrorX, &mut self.velocity_x0, &self.velocity_x, self.viscosity, dt, iters);
        diffuse(Boundary::MirrorY, &mut self.velocity_y0, &self.velocity_y, self.viscosity, dt, iters);

        // The current grids are free until advection writes them, so they hold pressure and
        // divergence here.
        project(&mut self.velocity_x0, &mut self.velocity_y0, &mut self.velocity_x, &mut self.velocity_y, iters);

        // Velocity carries itself along the divergence-free scratch field.
        advect(Boundary::MirrorX, &mut self.velocity_x, &self.velocity_x0, &self.velocity_x0, &self.velocity_y0, dt);
        advect(Boundary::MirrorY, &mut self.velocity_y, &self.velocity_y0, &self.velocity_x0, &self.velocity_y0, dt);

        project(&mut self.velocity_x, &mut self.velocity_y, &mut self.velocity_x0, &mut self.velocity_y0, iters);

        diffuse(Boundary::Scalar, &mut self.density_prev, &self.density, self.diffusion, dt, iters);
        advect(Boundary::Scalar, &mut self.density, &self.density_prev, &self.velocity_x, &self.velocity_y, dt);
    }
}
