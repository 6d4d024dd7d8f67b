use std::path::Path;

use eddy_fluids::{emitter::jet::Jet, scene::Scene, stable::d2::{StableFluid2D, StableFluid2DParams}};
use eddy_view::Stirring;
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// A scenario, usually read from a YAML file. Every section and field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub run: RunConfig,
    pub emitters: Vec<EmitterConfig>,
    pub stirring: StirringConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub resolution: usize,
    pub dt: f32,
    pub diffusion: f32,
    pub viscosity: f32,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frames: u64,
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmitterConfig {
    Jet(JetConfig),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JetConfig {
    pub position: [f32; 2],
    pub density: f32,
    pub velocity: [f32; 2],
    pub radius: u32,
    pub start: u64,
    pub end: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StirringConfig {
    pub density: f32,
    pub force: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            run: RunConfig::default(),
            emitters: vec![EmitterConfig::Jet(JetConfig::default())],
            stirring: StirringConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let params = StableFluid2DParams::default();

        Self {
            resolution: 64,
            dt: params.dt,
            diffusion: params.diffusion,
            viscosity: params.viscosity,
            iterations: params.iterations,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            fps: 30,
        }
    }
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            position: [0.5, 0.1],
            density: 5.0,
            velocity: [0.0, 2.0],
            radius: 1,
            start: 0,
            end: None,
        }
    }
}

impl Default for StirringConfig {
    fn default() -> Self {
        let stirring = Stirring::default();

        Self {
            density: stirring.density,
            force: stirring.force,
        }
    }
}

impl Config {
    /// Reads and validates a scenario, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                let config = Self::from_yaml(&contents)?;
                log::info!("loaded scenario from {}", path.display());
                config
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;

        if physics.resolution == 0 {
            return Err(ConfigError::Invalid("physics.resolution must be at least 1".into()));
        }
        if !(physics.dt.is_finite() && physics.dt > 0.0) {
            return Err(ConfigError::Invalid(format!("physics.dt must be positive, got {}", physics.dt)));
        }
        for (name, rate) in [("diffusion", physics.diffusion), ("viscosity", physics.viscosity)] {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(ConfigError::Invalid(format!("physics.{name} must be non-negative, got {rate}")));
            }
        }
        if self.run.fps == 0 {
            return Err(ConfigError::Invalid("run.fps must be at least 1".into()));
        }

        for (i, emitter) in self.emitters.iter().enumerate() {
            match emitter {
                EmitterConfig::Jet(jet) => {
                    let values = jet.position.iter().chain(&jet.velocity).chain([&jet.density]);
                    if values.into_iter().any(|v| !v.is_finite()) {
                        return Err(ConfigError::Invalid(format!("emitters[{i}] has a non-finite value")));
                    }
                    if jet.end.is_some_and(|end| end <= jet.start) {
                        return Err(ConfigError::Invalid(format!("emitters[{i}] ends before it starts")));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn params(&self) -> StableFluid2DParams {
        StableFluid2DParams {
            dt: self.physics.dt,
            diffusion: self.physics.diffusion,
            viscosity: self.physics.viscosity,
            iterations: self.physics.iterations,
        }
    }

    pub fn stirring(&self) -> Stirring {
        Stirring {
            density: self.stirring.density,
            force: self.stirring.force,
        }
    }

    /// Builds the fluid and its emitters.
    pub fn build_scene(&self) -> Scene<StableFluid2D> {
        let mut scene = Scene::new(StableFluid2D::with_params(self.physics.resolution, self.params()));

        for emitter in &self.emitters {
            match emitter {
                EmitterConfig::Jet(jet) => {
                    scene.add_emitter(
                        Jet::new(Vec2::from(jet.position), jet.density, Vec2::from(jet.velocity))
                            .with_radius(jet.radius)
                            .active(jet.start, jet.end),
                    );
                }
            }
        }

        scene
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}
