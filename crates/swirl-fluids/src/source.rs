use std::collections::BTreeMap;

use glam::{UVec2, Vec2};

use crate::{error::FluidError, Fluid};

/// A grid cell that emits dye and pushes the fluid every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub position: UVec2,
    /// Density added per step.
    pub density: f32,
    /// Velocity added per step.
    pub velocity: Vec2,
    /// Rotation of `velocity` per step, in radians.
    pub spin: f32,
}

impl Source {
    pub fn new(position: UVec2) -> Self {
        Source {
            position,
            density: 0.0,
            velocity: Vec2::ZERO,
            spin: 0.0,
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn set_position(&mut self, pos: UVec2) {
        self.position = pos;
    }

    /// Whether the source lies on a grid of the given size.
    pub fn fits(&self, size: usize) -> bool {
        (self.position.x as usize) < size && (self.position.y as usize) < size
    }

    /// Adds this source's density and velocity to its cell.
    pub fn inject<F: Fluid>(&self, fluid: &mut F) -> Result<(), FluidError> {
        let x = self.position.x as usize;
        let y = self.position.y as usize;

        fluid.add_density(x, y, self.density)?;
        fluid.add_velocity(x, y, self.velocity.x, self.velocity.y)
    }

    /// Turns the emission direction by `spin`. Called once per step, after injecting.
    pub fn advance(&mut self) {
        if self.spin != 0.0 {
            self.velocity = Vec2::from_angle(self.spin).rotate(self.velocity);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub usize);

/// Sources keyed by ID, injected in ID order so a step is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub sources: BTreeMap<usize, Source>,
}

impl SourceSet {
    pub fn new(sources: BTreeMap<usize, Source>) -> Self {
        SourceSet {
            sources,
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(&id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &Source)> {
        self.sources.iter().map(|(&i, s)| (SourceId(i), s))
    }

    /// Injects every source into `fluid`, then advances each one.
    pub fn emit<F: Fluid>(&mut self, fluid: &mut F) -> Result<(), FluidError> {
        for source in self.sources.values_mut() {
            source.inject(fluid)?;
            source.advance();
        }

        Ok(())
    }
}
