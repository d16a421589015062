//! Settings for the demo, loaded from an optional RON file and then
//! overridden from the command line.

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::sphere::{DEFAULT_ANGULAR_STEP, MIN_ANGULAR_STEP};
use crate::model::clock::DEFAULT_SPEED_STEP;

mod cli;

pub use cli::CliArgs;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub animation: AnimationConfig,
    pub mesh: MeshConfig,
    pub textures: TextureConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Multiplier on every rotation and revolution rate.
    pub initial_speed: f32,
    /// How much one press of the speed keys changes the multiplier.
    pub speed_step: f32,
    pub start_playing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Sphere sampling step in radians. Smaller is smoother.
    pub angular_step: f32,
}

/// Paths of the equirectangular maps wrapped around each body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    pub sun: String,
    pub earth: String,
    pub moon: String,
    pub stars: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Filter directive used when RUST_LOG isn't set, e.g. "info" or
    /// "solar_orrery=debug".
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "Solar System".to_string(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial_speed: 1.0,
            speed_step: DEFAULT_SPEED_STEP,
            start_playing: true,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            angular_step: DEFAULT_ANGULAR_STEP,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            sun: "textures/2k_sun.jpg".to_string(),
            earth: "textures/2k_earth_daymap.jpg".to_string(),
            moon: "textures/2k_moon.jpg".to_string(),
            stars: "textures/2k_stars.jpg".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TextureConfig {
    pub fn paths(&self) -> [&str; 4] {
        [&self.sun, &self.earth, &self.moon, &self.stars]
    }
}

impl Config {
    /// Reads a config file. Missing sections and fields fall back to their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that the clock and the mesher can't work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let animation = &self.animation;
        check(
            "animation.initial_speed",
            animation.initial_speed,
            animation.initial_speed.is_finite() && animation.initial_speed >= 0.0,
            "must be finite and non-negative",
        )?;
        check(
            "animation.speed_step",
            animation.speed_step,
            animation.speed_step.is_finite() && animation.speed_step >= 0.0,
            "must be finite and non-negative",
        )?;
        let step = self.mesh.angular_step;
        check(
            "mesh.angular_step",
            step,
            step.is_finite() && (MIN_ANGULAR_STEP..=PI).contains(&step),
            "must be between 0.01 and pi",
        )
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Loads the file named on the command line (defaults otherwise), then
    /// applies the remaining overrides.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }
}

fn check(field: &'static str, value: f32, ok: bool, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason,
        })
    }
}
