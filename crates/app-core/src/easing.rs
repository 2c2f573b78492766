//! Frame-rate independent exponential smoothing.

use glam::Vec3;

/// Move `current` toward `target` by the fraction that a time constant of
/// `tau` seconds allows in `dt` seconds.
///
/// The step is exact under subdivision: advancing by `2h` equals advancing
/// twice by `h`, so animation speed never depends on frame rate. The value
/// approaches the target monotonically and cannot overshoot. `tau` must be
/// positive; a non-positive time constant is a programmer error, not a
/// runtime condition.
#[inline]
pub fn damp(current: f32, target: f32, tau: f32, dt: f32) -> f32 {
    debug_assert!(tau > 0.0, "damping time constant must be positive");
    current + (target - current) * (1.0 - (-dt / tau).exp())
}

/// Per-axis [`damp`] for vectors.
#[inline]
pub fn damp3(current: Vec3, target: Vec3, tau: f32, dt: f32) -> Vec3 {
    Vec3::new(
        damp(current.x, target.x, tau, dt),
        damp(current.y, target.y, tau, dt),
        damp(current.z, target.z, tau, dt),
    )
}
