use std::path::Path;

use log::info;
use serde::Deserialize;
use swirl_fluids::stable::DEFAULT_GRID_SIZE;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub run: RunConfig,
    /// Point sources. An empty list gets one source in the middle of the grid.
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub size: usize,
    pub dt: f32,
    pub diffusion: f32,
    pub viscosity: f32,
    pub iterations: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frames: u64,
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub x: u32,
    pub y: u32,
    pub density: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub spin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            dt: 0.01,
            diffusion: 0.0,
            viscosity: 0.0,
            iterations: 4,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            density: 100.0,
            velocity_x: 6.4,
            velocity_y: 0.0,
            spin: 0.05,
        }
    }
}

impl Config {
    /// The configured sources, or a single default source centred on the grid.
    pub fn sources(&self) -> Vec<SourceConfig> {
        if !self.sources.is_empty() {
            return self.sources.clone();
        }

        let centre = (self.physics.size / 2) as u32;
        vec![SourceConfig { x: centre, y: centre, ..SourceConfig::default() }]
    }
}

/// Loads `path`, falling back to defaults when the file does not exist.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        info!("{} not found, using default configuration", path.display());
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
