//! The tree-topper accent: a single object eased toward mode-dependent
//! targets with the same damping primitive the morph engine uses, plus a
//! constant spin. O(1) per frame.

use glam::{Quat, Vec3};

use crate::config::{ConfigError, StarParams};
use crate::easing::{damp, damp3};
use crate::mode::FormationMode;
use crate::state::InstanceTransform;

pub struct StarAnimator {
    params: StarParams,
    position: Vec3,
    scale: f32,
    spin_angle: f32,
}

impl StarAnimator {
    /// Starts at the scatter point with zero scale, invisible until the
    /// first formed transition.
    pub fn new(params: StarParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let position = params.scatter_position;
        Ok(Self {
            params,
            position,
            scale: 0.0,
            spin_angle: 0.0,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub fn advance(&mut self, dt: f32, mode: FormationMode) {
        let (target_position, target_scale) = match mode {
            FormationMode::Formed => (self.params.formed_position, 1.0),
            FormationMode::Scattered => (self.params.scatter_position, 0.0),
        };
        self.position = damp3(self.position, target_position, self.params.position_tau, dt);
        self.scale = damp(self.scale, target_scale, self.params.scale_tau, dt);
        // Constant spin, independent of mode and undamped.
        self.spin_angle += self.params.spin_rate * dt;
    }

    /// Current transform for the renderer; the spin is about the Y axis.
    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform {
            position: self.position,
            rotation: Quat::from_rotation_y(self.spin_angle),
            scale: self.scale,
        }
    }
}
