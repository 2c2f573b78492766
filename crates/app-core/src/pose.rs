//! Endpoint pose generation for the particle collections.
//!
//! Pure functions of `(count, config, rng)`: given a seeded RNG the output
//! is fully deterministic, which the tests rely on. No per-frame behavior
//! lives here.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::config::SceneConfig;
use crate::constants::{EMERALD_DEEP, EMERALD_LIGHT, GEM_RED, GOLD_METALLIC, GOLD_ROSE};

/// A particle's pair of endpoint transforms plus its static size and color.
/// Created once, immutable for the particle's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct DualPose {
    pub scatter_position: Vec3,
    pub scatter_rotation: Quat,
    pub tree_position: Vec3,
    pub tree_rotation: Quat,
    pub scale: f32,
    pub color: [f32; 3],
}

/// Uniform random point inside a sphere; the cube root keeps radial density
/// uniform instead of clumping at the center.
fn random_sphere_point(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;
    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

fn random_tumble(rng: &mut impl Rng) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        rng.gen::<f32>() * PI,
        rng.gen::<f32>() * PI,
        rng.gen::<f32>() * PI,
    )
}

fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Generate the dense foliage particles.
///
/// Scatter pose: uniform point in the scatter sphere, random tumble.
/// Tree pose: random fill of the cone volume, biased toward the surface so
/// the silhouette reads as foliage rather than a solid.
pub fn generate_needles(count: usize, config: &SceneConfig, rng: &mut impl Rng) -> Vec<DualPose> {
    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        let scatter_position = random_sphere_point(rng, config.scatter_radius);
        let scatter_rotation = random_tumble(rng);

        let h = rng.gen::<f32>() * config.tree_height;
        let max_r = (config.tree_height - h) / config.tree_height * config.tree_base_radius;
        let r = max_r * (0.6 + 0.4 * rng.gen::<f32>());
        let angle = rng.gen::<f32>() * TAU;
        let tree_position = Vec3::new(
            r * angle.cos(),
            h - config.tree_height / 2.0, // centered vertically
            r * angle.sin(),
        );
        let tree_rotation = random_tumble(rng);

        let mut color = lerp_rgb(EMERALD_DEEP, EMERALD_LIGHT, rng.gen::<f32>());
        if rng.gen::<f32>() > 0.95 {
            color = GOLD_METALLIC;
        }

        data.push(DualPose {
            scatter_position,
            scatter_rotation,
            tree_position,
            tree_rotation,
            scale: 0.2 + 0.3 * rng.gen::<f32>(),
            color,
        });
    }
    data
}

/// Generate the larger ornament particles.
///
/// Tree pose sits on the cone surface, pushed slightly outside the bulk of
/// the needles; the tree-side rotation carries no roll so ornaments hang
/// upright-ish once formed.
pub fn generate_ornaments(count: usize, config: &SceneConfig, rng: &mut impl Rng) -> Vec<DualPose> {
    let mut data = Vec::with_capacity(count);
    for _ in 0..count {
        let scatter_position = random_sphere_point(rng, config.scatter_radius * 0.9);
        let scatter_rotation = random_tumble(rng);

        let h = rng.gen::<f32>() * config.tree_height;
        let max_r = (config.tree_height - h) / config.tree_height * config.tree_base_radius;
        let r = max_r + 0.2;
        let angle = rng.gen::<f32>() * TAU;
        let tree_position = Vec3::new(
            r * angle.cos(),
            h - config.tree_height / 2.0,
            r * angle.sin(),
        );
        let tree_rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen::<f32>() * PI,
            rng.gen::<f32>() * PI,
            0.0,
        );

        let mut color = lerp_rgb(GOLD_METALLIC, GOLD_ROSE, rng.gen::<f32>());
        if rng.gen::<f32>() > 0.8 {
            color = GEM_RED;
        }

        data.push(DualPose {
            scatter_position,
            scatter_rotation,
            tree_position,
            tree_rotation,
            scale: 0.5 + 0.5 * rng.gen::<f32>(),
            color,
        });
    }
    data
}
