use log::debug;

use super::{error::FluidError, source::{Source, SourceId, SourceSet}, Fluid};

/// A simulation session: one fluid, the parameters it steps with, and the sources feeding it.
pub struct Scene<F, P> {
    /// The fluid for this scene.
    pub fluid: F,
    /// The parameters for this scene's fluid.
    params: P,
    /// The sources in this scene.
    sources: SourceSet,
    /// The number of sources ever added (used for IDs).
    n_sources: usize,
    /// Completed steps.
    frame: u64,
}

impl<F: Fluid<Params = P>, P> Scene<F, P> {
    #[inline(always)]
    pub fn new(fluid: F, params: P) -> Self {
        Self {
            params,
            fluid,
            sources: SourceSet::default(),
            n_sources: 0,
            frame: 0,
        }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.fluid.size()
    }

    #[inline(always)]
    pub fn params(&self) -> &P {
        &self.params
    }

    #[inline(always)]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// Adds a source to the scene, returning its ID.
    pub fn add_source(&mut self, source: Source) -> Result<SourceId, FluidError> {
        self.check_source(&source)?;

        let i = self.n_sources;
        self.n_sources += 1;

        debug!("source {i} added at {}", source.position);
        self.sources.sources.insert(i, source);
        Ok(SourceId(i))
    }

    /// Removes a source from the scene, given its ID.
    pub fn remove_source(&mut self, id: SourceId) -> Option<Source> {
        self.sources.sources.remove(&id.0)
    }

    /// Insert a source into the scene at the given ID, overriding and returning the old value if
    /// it was previously in the scene.
    pub fn insert_source(&mut self, id: SourceId, source: Source) -> Result<Option<Source>, FluidError> {
        self.check_source(&source)?;
        Ok(self.sources.sources.insert(id.0, source))
    }

    /// Injects every source, then advances the fluid by one step.
    pub fn step(&mut self) -> Result<(), FluidError> {
        self.sources.emit(&mut self.fluid)?;
        self.fluid.step(&self.params);
        self.frame += 1;

        Ok(())
    }

    fn check_source(&self, source: &Source) -> Result<(), FluidError> {
        if source.fits(self.size()) {
            Ok(())
        } else {
            Err(FluidError::OutOfRange {
                x: source.position.x as usize,
                y: source.position.y as usize,
                size: self.size(),
            })
        }
    }
}
