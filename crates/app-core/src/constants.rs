use glam::Vec3;

// Shared scene tuning constants used by both web and native frontends.

// Particle populations
pub const NEEDLE_COUNT: usize = 7000; // dense small cubes forming the foliage
pub const ORNAMENT_COUNT: usize = 250;

// Endpoint geometry
pub const SCATTER_RADIUS: f32 = 35.0; // radius of the scattered cloud
pub const TREE_HEIGHT: f32 = 14.0;
pub const TREE_BASE_RADIUS: f32 = 6.0;

// Damping time constants, seconds to cover ~63% of the remaining distance
pub const MORPH_TAU: f32 = 0.8;
pub const STAR_POSITION_TAU: f32 = 1.5;
pub const STAR_SCALE_TAU: f32 = 1.0;

// Wind sway while formed
pub const SWAY_AMPLITUDE: f32 = 0.05;
pub const SWAY_FREQUENCY: f32 = 2.0; // rad/s of the traveling wave
pub const SWAY_WAVENUMBER: f32 = 0.5; // phase per unit of tree height

// Idle float while scattered
pub const IDLE_AMPLITUDE: f32 = 0.02;

// Traveling highlight band that climbs the formed tree
pub const HIGHLIGHT_THRESHOLD: f32 = 0.9; // progress below this disables the band
pub const HIGHLIGHT_WAVE_SPEED: f32 = 0.5;
pub const HIGHLIGHT_WAVE_PERIOD: f32 = 2.0;
pub const HIGHLIGHT_BAND_HALF_WIDTH: f32 = 0.2;
pub const HIGHLIGHT_GAIN: f32 = 1.5;

// Star accent
pub const STAR_SPIN_RATE: f32 = 0.5; // rad/s, constant and undamped
pub const STAR_TOP_CLEARANCE: f32 = 0.5; // gap between tree tip and star
pub const STAR_SCATTER_POSITION: [f32; 3] = [10.0, 20.0, -10.0];

// Camera
pub const CAMERA_DISTANCE: f32 = 35.0;
pub const CAMERA_HEIGHT: f32 = 2.0;
pub const CAMERA_ORBIT_RATE: f32 = 0.1; // rad/s auto-orbit while formed

// Palette (linear RGB)
pub const EMERALD_DEEP: [f32; 3] = [0.0, 0.169, 0.067];
pub const EMERALD_LIGHT: [f32; 3] = [0.063, 0.725, 0.506];
pub const GOLD_METALLIC: [f32; 3] = [1.0, 0.843, 0.0];
pub const GOLD_ROSE: [f32; 3] = [1.0, 0.702, 0.729];
pub const GEM_RED: [f32; 3] = [1.0, 0.2, 0.4];

#[inline]
pub fn star_scatter_vec3() -> Vec3 {
    Vec3::new(
        STAR_SCATTER_POSITION[0],
        STAR_SCATTER_POSITION[1],
        STAR_SCATTER_POSITION[2],
    )
}
