// Host-side integration tests for the morph animation engine.

use app_core::{generate_needles, ConfigError, DualPose, FormationMode, MorphEngine, MorphParams, SceneConfig};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn record(scatter: Vec3, tree: Vec3, scale: f32) -> DualPose {
    DualPose {
        scatter_position: scatter,
        scatter_rotation: Quat::from_rotation_x(0.3),
        tree_position: tree,
        tree_rotation: Quat::from_rotation_z(1.1),
        scale,
        color: [0.1, 0.6, 0.3],
    }
}

/// Params with the time-varying position terms zeroed, for exact endpoint
/// checks.
fn still_params() -> MorphParams {
    MorphParams {
        sway_amplitude: 0.0,
        idle_amplitude: 0.0,
        highlight_gain: 0.0,
        ..MorphParams::default()
    }
}

fn drive(engine: &mut MorphEngine, mode: FormationMode, seconds: f32, dt: f32) {
    let steps = (seconds / dt).round() as usize;
    let mut elapsed = 0.0;
    for _ in 0..steps {
        elapsed += dt;
        engine.advance(dt, elapsed, mode);
    }
}

#[test]
fn initial_transforms_are_the_scatter_pose() {
    let records = vec![
        record(Vec3::new(3.0, -2.0, 5.0), Vec3::new(0.0, 1.0, 0.0), 0.4),
        record(Vec3::new(-8.0, 0.5, 1.0), Vec3::new(2.0, -3.0, 1.0), 0.25),
    ];
    let expected = records.clone();
    let engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    assert_eq!(engine.progress(), 0.0);
    for (t, r) in engine.transforms().iter().zip(&expected) {
        assert_eq!(t.position, r.scatter_position);
        assert_eq!(t.rotation, r.scatter_rotation);
        assert_eq!(t.scale, r.scale);
    }
}

#[test]
fn progress_converges_monotonically_toward_the_target() {
    let records = vec![record(Vec3::ZERO, Vec3::ONE, 0.3)];
    let mut engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    let mut prev = engine.progress();
    for step in 0..200 {
        engine.advance(0.016, step as f32 * 0.016, FormationMode::Formed);
        let p = engine.progress();
        assert!(p > prev, "progress stalled or reversed at step {step}");
        assert!(p <= 1.0, "progress left [0, 1] at step {step}: {p}");
        prev = p;
    }
}

#[test]
fn full_cycle_reaches_both_endpoints() {
    let records = vec![
        record(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0), 0.3),
        record(Vec3::new(-4.0, 2.0, 8.0), Vec3::new(1.0, -5.0, 2.0), 0.3),
        record(Vec3::new(0.0, -9.0, 3.0), Vec3::new(-2.0, 0.0, -1.0), 0.3),
    ];
    let params = MorphParams::default();
    let ten_taus = 10.0 * params.morph_tau;
    let mut engine = MorphEngine::new(records, params).unwrap();

    drive(&mut engine, FormationMode::Formed, ten_taus, 0.05);
    assert!(
        engine.progress() > 0.9999,
        "not formed after ten time constants: {}",
        engine.progress()
    );

    drive(&mut engine, FormationMode::Scattered, ten_taus, 0.05);
    assert!(
        engine.progress() < 0.0001,
        "not scattered after ten time constants: {}",
        engine.progress()
    );
}

#[test]
fn scattered_endpoint_is_exact_when_motion_is_stilled() {
    let records = vec![record(Vec3::new(3.0, -2.0, 5.0), Vec3::new(0.0, 1.0, 0.0), 0.4)];
    let expected = records.clone();
    let mut engine = MorphEngine::new(records, still_params()).unwrap();

    engine.advance(0.016, 3.3, FormationMode::Scattered);
    assert_eq!(engine.progress(), 0.0, "progress already at target must not move");
    let t = &engine.transforms()[0];
    assert_eq!(t.position, expected[0].scatter_position);
    assert!(t.rotation.dot(expected[0].scatter_rotation).abs() > 1.0 - 1e-6);
    assert_eq!(t.scale, expected[0].scale);
}

#[test]
fn formed_endpoint_is_reached_within_tolerance() {
    let records = vec![
        record(Vec3::new(20.0, -15.0, 8.0), Vec3::new(0.0, 5.0, 0.0), 0.4),
        record(Vec3::new(-30.0, 4.0, -12.0), Vec3::new(2.0, -6.0, 1.0), 0.2),
    ];
    let expected = records.clone();
    let mut engine = MorphEngine::new(records, still_params()).unwrap();

    drive(&mut engine, FormationMode::Formed, 8.0, 0.05);
    for (t, r) in engine.transforms().iter().zip(&expected) {
        let err = (t.position - r.tree_position).length();
        assert!(err < 5e-3, "position still {err} away from the tree pose");
        assert!(t.rotation.dot(r.tree_rotation).abs() > 1.0 - 1e-4);
        assert_eq!(t.scale, r.scale, "highlight disabled, scale must be base");
    }
}

#[test]
fn advance_at_rest_is_idempotent_for_fixed_time() {
    // At the target with the clock held still, a second advance must
    // reproduce the exact same buffer.
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let records = generate_needles(64, &config, &mut rng);
    let mut engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    engine.advance(0.016, 5.0, FormationMode::Scattered);
    let first: Vec<_> = engine.transforms().to_vec();
    engine.advance(0.016, 5.0, FormationMode::Scattered);
    assert_eq!(engine.transforms(), first.as_slice());
}

#[test]
fn idle_float_desynchronizes_by_particle_index() {
    // Two records with identical poses must still move apart while
    // scattered, because the idle phase is offset by the index.
    let r = record(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 4.0, 0.0), 0.3);
    let mut engine =
        MorphEngine::new(vec![r.clone(), r], MorphParams::default()).unwrap();

    engine.advance(0.016, 1.0, FormationMode::Scattered);
    let a = engine.transforms()[0].position;
    let b = engine.transforms()[1].position;
    assert_ne!(a, b, "identical records did not desynchronize");
}

#[test]
fn highlight_band_is_local_and_decreasing() {
    // Tree height 14: flow phase (y + 7) / 14. At elapsed 2.0 the wave
    // position is 1.0, centering the band on flow phase 0.5, i.e. y = 0.
    let base = 1.0;
    let records = vec![
        record(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), base), // dist 0.0
        record(Vec3::ZERO, Vec3::new(0.0, 1.4, 0.0), base), // dist 0.1
        record(Vec3::ZERO, Vec3::new(0.0, 7.0, 0.0), base), // dist 0.5, outside
    ];
    let mut engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    // Push progress above the highlight threshold, then take one step at
    // the elapsed time under test.
    drive(&mut engine, FormationMode::Formed, 3.0, 0.05);
    assert!(engine.progress() > 0.9, "test needs a formed collection");
    engine.advance(0.016, 2.0, FormationMode::Formed);

    let s0 = engine.transforms()[0].scale;
    let s1 = engine.transforms()[1].scale;
    let s2 = engine.transforms()[2].scale;
    assert!((s0 - base * 1.3).abs() < 1e-5, "band center gain wrong: {s0}");
    assert!((s1 - base * 1.15).abs() < 1e-5, "mid-band gain wrong: {s1}");
    assert_eq!(s2, base, "particle outside the band must keep its base scale");
    assert!(s0 > s1 && s1 > s2, "gain must decrease with distance from the band");
}

#[test]
fn no_highlight_below_the_progress_threshold() {
    let base = 0.7;
    let records = vec![record(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), base)];
    let mut engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    // A handful of frames leaves progress far below 0.9.
    drive(&mut engine, FormationMode::Formed, 0.2, 0.05);
    assert!(engine.progress() < 0.9);
    engine.advance(0.016, 2.0, FormationMode::Formed);
    assert_eq!(engine.transforms()[0].scale, base);
}

#[test]
fn dirty_flag_is_per_frame() {
    let records = vec![record(Vec3::ZERO, Vec3::ONE, 0.3)];
    let mut engine = MorphEngine::new(records, MorphParams::default()).unwrap();

    assert!(engine.take_dirty(), "initial buffer write must be flagged");
    assert!(!engine.take_dirty(), "flag must clear after being taken");
    engine.advance(0.016, 0.016, FormationMode::Formed);
    assert!(engine.take_dirty());
}

#[test]
fn empty_collection_is_valid() {
    let mut engine = MorphEngine::new(Vec::new(), MorphParams::default()).unwrap();
    assert!(engine.is_empty());
    engine.advance(0.016, 1.0, FormationMode::Formed);
    assert!(engine.transforms().is_empty());
}

#[test]
fn construction_rejects_degenerate_params() {
    let records = vec![record(Vec3::ZERO, Vec3::ONE, 0.3)];

    let bad_tau = MorphParams {
        morph_tau: 0.0,
        ..MorphParams::default()
    };
    assert!(matches!(
        MorphEngine::new(records.clone(), bad_tau),
        Err(ConfigError::NonPositiveTimeConstant { .. })
    ));

    let bad_height = MorphParams {
        tree_height: 0.0,
        ..MorphParams::default()
    };
    assert!(matches!(
        MorphEngine::new(records, bad_height),
        Err(ConfigError::NonPositiveTreeHeight(_))
    ));
}
