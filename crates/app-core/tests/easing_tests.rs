// Host-side tests for the damping primitive.

use app_core::{damp, damp3};
use glam::Vec3;

#[test]
fn damp_converges_after_ten_time_constants() {
    let tau = 0.8_f32;
    let mut x = 0.0_f32;
    let dt = 0.05_f32;
    let steps = (10.0 * tau / dt) as usize;
    for _ in 0..steps {
        x = damp(x, 1.0, tau, dt);
    }
    assert!(x > 0.9999, "expected near-complete convergence, got {x}");
}

#[test]
fn damp_is_frame_rate_independent() {
    // One step of 2h must equal two successive steps of h.
    let tau = 0.8_f32;
    let h = 0.016_f32;
    for start in [0.0_f32, 0.25, 0.7, 1.0] {
        let whole = damp(start, 1.0, tau, 2.0 * h);
        let halved = damp(damp(start, 1.0, tau, h), 1.0, tau, h);
        assert!(
            (whole - halved).abs() < 1e-5,
            "split step diverged from whole step: {whole} vs {halved} (start {start})"
        );
    }
}

#[test]
fn damp_is_monotonic_and_never_overshoots() {
    let tau = 0.8_f32;
    let dt = 0.016_f32;
    let mut x = 0.0_f32;
    let mut prev = x;
    for step in 0..100 {
        x = damp(x, 1.0, tau, dt);
        assert!(x > prev, "progress stalled or reversed at step {step}");
        assert!(x <= 1.0, "progress overshot the target at step {step}: {x}");
        prev = x;
    }

    // Same property approaching zero from above.
    let mut y = 1.0_f32;
    let mut prev = y;
    for step in 0..100 {
        y = damp(y, 0.0, tau, dt);
        assert!(y < prev, "descent stalled or reversed at step {step}");
        assert!(y >= 0.0, "descent overshot zero at step {step}: {y}");
        prev = y;
    }
}

#[test]
fn damp_at_target_is_a_fixed_point() {
    assert_eq!(damp(1.0, 1.0, 0.8, 0.016), 1.0);
    assert_eq!(damp(0.0, 0.0, 0.8, 0.016), 0.0);
}

#[test]
fn damp_with_zero_dt_is_identity() {
    let x = 0.37_f32;
    assert_eq!(damp(x, 1.0, 0.8, 0.0), x);
}

#[test]
fn damp3_matches_per_axis_damp() {
    let current = Vec3::new(1.0, -2.0, 3.0);
    let target = Vec3::new(0.0, 4.0, 3.0);
    let stepped = damp3(current, target, 1.5, 0.02);
    assert_eq!(stepped.x, damp(current.x, target.x, 1.5, 0.02));
    assert_eq!(stepped.y, damp(current.y, target.y, 1.5, 0.02));
    assert_eq!(stepped.z, damp(current.z, target.z, 1.5, 0.02));
}
