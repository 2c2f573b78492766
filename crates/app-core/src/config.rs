//! Validated construction-time parameters.
//!
//! Counts, radii and time constants are checked once, up front; nothing is
//! silently clamped. The motion coefficients are aesthetic tunings carried
//! as plain fields so frontends can adjust them without touching the engine.

use glam::Vec3;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tree height must be positive, got {0}")]
    NonPositiveTreeHeight(f32),
    #[error("scatter radius must be positive, got {0}")]
    NonPositiveScatterRadius(f32),
    #[error("tree base radius must be positive, got {0}")]
    NonPositiveBaseRadius(f32),
    #[error("{name} time constant must be positive, got {value}")]
    NonPositiveTimeConstant { name: &'static str, value: f32 },
    #[error("highlight wave period must be positive, got {0}")]
    NonPositiveWavePeriod(f32),
}

/// Static layout of the scene: particle populations and endpoint geometry.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub needle_count: usize,
    pub ornament_count: usize,
    pub scatter_radius: f32,
    pub tree_height: f32,
    pub tree_base_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            needle_count: NEEDLE_COUNT,
            ornament_count: ORNAMENT_COUNT,
            scatter_radius: SCATTER_RADIUS,
            tree_height: TREE_HEIGHT,
            tree_base_radius: TREE_BASE_RADIUS,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_height <= 0.0 {
            return Err(ConfigError::NonPositiveTreeHeight(self.tree_height));
        }
        if self.scatter_radius <= 0.0 {
            return Err(ConfigError::NonPositiveScatterRadius(self.scatter_radius));
        }
        if self.tree_base_radius <= 0.0 {
            return Err(ConfigError::NonPositiveBaseRadius(self.tree_base_radius));
        }
        Ok(())
    }
}

/// Tuning for the per-particle morph animation.
#[derive(Clone, Debug)]
pub struct MorphParams {
    pub morph_tau: f32,
    /// Height of the formed shape; normalizes the highlight band phase.
    pub tree_height: f32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub sway_wavenumber: f32,
    pub idle_amplitude: f32,
    pub highlight_threshold: f32,
    pub highlight_wave_speed: f32,
    pub highlight_wave_period: f32,
    pub highlight_band_half_width: f32,
    pub highlight_gain: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            morph_tau: MORPH_TAU,
            tree_height: TREE_HEIGHT,
            sway_amplitude: SWAY_AMPLITUDE,
            sway_frequency: SWAY_FREQUENCY,
            sway_wavenumber: SWAY_WAVENUMBER,
            idle_amplitude: IDLE_AMPLITUDE,
            highlight_threshold: HIGHLIGHT_THRESHOLD,
            highlight_wave_speed: HIGHLIGHT_WAVE_SPEED,
            highlight_wave_period: HIGHLIGHT_WAVE_PERIOD,
            highlight_band_half_width: HIGHLIGHT_BAND_HALF_WIDTH,
            highlight_gain: HIGHLIGHT_GAIN,
        }
    }
}

impl MorphParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.morph_tau <= 0.0 {
            return Err(ConfigError::NonPositiveTimeConstant {
                name: "morph",
                value: self.morph_tau,
            });
        }
        if self.tree_height <= 0.0 {
            return Err(ConfigError::NonPositiveTreeHeight(self.tree_height));
        }
        if self.highlight_wave_period <= 0.0 {
            return Err(ConfigError::NonPositiveWavePeriod(self.highlight_wave_period));
        }
        Ok(())
    }
}

/// Tuning for the star accent animator.
#[derive(Clone, Debug)]
pub struct StarParams {
    pub position_tau: f32,
    pub scale_tau: f32,
    pub spin_rate: f32,
    pub formed_position: Vec3,
    pub scatter_position: Vec3,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            position_tau: STAR_POSITION_TAU,
            scale_tau: STAR_SCALE_TAU,
            spin_rate: STAR_SPIN_RATE,
            formed_position: Vec3::new(0.0, TREE_HEIGHT / 2.0 + STAR_TOP_CLEARANCE, 0.0),
            scatter_position: star_scatter_vec3(),
        }
    }
}

impl StarParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.position_tau <= 0.0 {
            return Err(ConfigError::NonPositiveTimeConstant {
                name: "star position",
                value: self.position_tau,
            });
        }
        if self.scale_tau <= 0.0 {
            return Err(ConfigError::NonPositiveTimeConstant {
                name: "star scale",
                value: self.scale_tau,
            });
        }
        Ok(())
    }
}
