// Host-side tests for pose generation and scene configuration.

use app_core::{generate_needles, generate_ornaments, ConfigError, SceneConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f32 = 1e-3;

#[test]
fn generation_is_deterministic_for_a_fixed_seed() {
    let config = SceneConfig::default();
    let a = generate_needles(200, &config, &mut StdRng::seed_from_u64(7));
    let b = generate_needles(200, &config, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b, "same seed must reproduce the same records");

    let c = generate_needles(200, &config, &mut StdRng::seed_from_u64(8));
    assert_ne!(a, c, "a different seed should not reproduce the records");
}

#[test]
fn generation_returns_exactly_the_requested_count() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(generate_needles(0, &config, &mut rng).len(), 0);
    assert_eq!(generate_needles(123, &config, &mut rng).len(), 123);
    assert_eq!(generate_ornaments(0, &config, &mut rng).len(), 0);
    assert_eq!(generate_ornaments(45, &config, &mut rng).len(), 45);
}

#[test]
fn needle_poses_stay_within_the_scene_envelope() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let half_height = config.tree_height / 2.0;

    for (i, p) in generate_needles(500, &config, &mut rng).iter().enumerate() {
        let scatter_r = p.scatter_position.length();
        assert!(
            scatter_r <= config.scatter_radius + EPS,
            "needle {i} scattered outside the cloud: {scatter_r}"
        );

        let y = p.tree_position.y;
        assert!(
            (-half_height..=half_height).contains(&y),
            "needle {i} outside the tree height: {y}"
        );
        let radial = (p.tree_position.x * p.tree_position.x
            + p.tree_position.z * p.tree_position.z)
            .sqrt();
        let max_r = (half_height - y) / config.tree_height * config.tree_base_radius;
        assert!(
            radial <= max_r + EPS,
            "needle {i} outside the cone at height {y}: {radial} > {max_r}"
        );

        assert!(
            (0.2..=0.5 + EPS).contains(&p.scale),
            "needle {i} scale out of range: {}",
            p.scale
        );
        for c in p.color {
            assert!((0.0..=1.0).contains(&c), "needle {i} color channel {c}");
        }
        assert!(p.scatter_rotation.is_normalized());
        assert!(p.tree_rotation.is_normalized());
    }
}

#[test]
fn ornament_poses_sit_on_the_cone_shell() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(4);
    let half_height = config.tree_height / 2.0;

    for (i, p) in generate_ornaments(300, &config, &mut rng).iter().enumerate() {
        let scatter_r = p.scatter_position.length();
        assert!(
            scatter_r <= config.scatter_radius * 0.9 + EPS,
            "ornament {i} scattered outside its tighter cloud: {scatter_r}"
        );

        let y = p.tree_position.y;
        let radial = (p.tree_position.x * p.tree_position.x
            + p.tree_position.z * p.tree_position.z)
            .sqrt();
        let shell_r = (half_height - y) / config.tree_height * config.tree_base_radius + 0.2;
        assert!(
            (radial - shell_r).abs() < EPS,
            "ornament {i} off the shell at height {y}: {radial} != {shell_r}"
        );

        assert!(
            (0.5..=1.0 + EPS).contains(&p.scale),
            "ornament {i} scale out of range: {}",
            p.scale
        );
    }
}

#[test]
fn default_config_validates() {
    assert!(SceneConfig::default().validate().is_ok());
}

#[test]
fn degenerate_configs_fail_fast() {
    let zero_height = SceneConfig {
        tree_height: 0.0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        zero_height.validate(),
        Err(ConfigError::NonPositiveTreeHeight(_))
    ));

    let negative_radius = SceneConfig {
        scatter_radius: -1.0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        negative_radius.validate(),
        Err(ConfigError::NonPositiveScatterRadius(_))
    ));

    let zero_base = SceneConfig {
        tree_base_radius: 0.0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        zero_base.validate(),
        Err(ConfigError::NonPositiveBaseRadius(_))
    ));
}
