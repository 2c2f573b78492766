//! The morph animation engine.
//!
//! Owns one collection of dual-pose records and a single formation-progress
//! scalar shared by the whole collection. Every frame it damps the progress
//! toward the mode's target, interpolates each particle between its two
//! endpoint poses, overlays the secondary motion (idle float, wind sway,
//! traveling highlight band) and writes the result into the instanced
//! transform buffer.

use crate::config::{ConfigError, MorphParams};
use crate::easing::damp;
use crate::mode::FormationMode;
use crate::pose::DualPose;
use crate::state::InstanceTransform;

pub struct MorphEngine {
    records: Vec<DualPose>,
    params: MorphParams,
    progress: f32,
    transforms: Vec<InstanceTransform>,
    dirty: bool,
}

impl MorphEngine {
    /// Build an engine over `records`. The initial transform buffer is the
    /// scatter pose of every record (progress 0), so the starting visual
    /// state is deterministic before any frame has run.
    pub fn new(records: Vec<DualPose>, params: MorphParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let transforms = records
            .iter()
            .map(|r| InstanceTransform {
                position: r.scatter_position,
                rotation: r.scatter_rotation,
                scale: r.scale,
            })
            .collect();
        log::debug!("morph engine ready: {} records", records.len());
        Ok(Self {
            records,
            params,
            progress: 0.0,
            transforms,
            dirty: true,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Formation progress in [0, 1], shared by the whole collection.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn records(&self) -> &[DualPose] {
        &self.records
    }

    /// The instanced transform buffer written by the last `advance` call.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Whether the transform buffer changed since the last call; clears the
    /// flag. One flag per frame, not per particle.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Advance the animation by `dt` seconds at wall-clock time `elapsed`,
    /// damping toward `mode`'s endpoint.
    pub fn advance(&mut self, dt: f32, elapsed: f32, mode: FormationMode) {
        let p = &self.params;
        self.progress = damp(self.progress, mode.target_progress(), p.morph_tau, dt);
        let progress = self.progress;

        let half_height = p.tree_height * 0.5;
        let wave_pos = (elapsed * p.highlight_wave_speed) % p.highlight_wave_period;
        let highlight_active = progress > p.highlight_threshold;

        for (i, (record, out)) in self
            .records
            .iter()
            .zip(self.transforms.iter_mut())
            .enumerate()
        {
            let mut position = record
                .scatter_position
                .lerp(record.tree_position, progress);

            match mode {
                FormationMode::Formed => {
                    // A wave traveling up the tree reads as wind sway; it
                    // scales with progress so it is only fully present once
                    // the shape has formed.
                    let phase = record.tree_position.y * p.sway_wavenumber - elapsed * p.sway_frequency;
                    position.x += phase.sin() * p.sway_amplitude * progress;
                    position.z += phase.cos() * p.sway_amplitude * progress;
                }
                FormationMode::Scattered => {
                    // The index offsets the phase so particles drift out of
                    // sync instead of bobbing in unison.
                    let k = i as f32;
                    position.x += (elapsed * 0.5 + k).cos() * p.idle_amplitude * (1.0 - progress);
                    position.y += (elapsed + k).sin() * p.idle_amplitude * (1.0 - progress);
                }
            }

            let rotation = record.scatter_rotation.slerp(record.tree_rotation, progress);

            let mut scale = record.scale;
            if highlight_active {
                // A band of enlarged particles climbing the formed shape.
                let flow_phase = (record.tree_position.y + half_height) / p.tree_height;
                let dist = (flow_phase - (wave_pos - 0.5)).abs();
                if dist < p.highlight_band_half_width {
                    scale *= 1.0 + (p.highlight_band_half_width - dist) * p.highlight_gain;
                }
            }

            *out = InstanceTransform {
                position,
                rotation,
                scale,
            };
        }

        self.dirty = true;
    }
}
