use super::*;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
    assert_eq!(EngineConfig::default().history.capacity, 30);
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg = EngineConfig::from_json_str(
        r#"{ "history": { "capacity": 12 }, "clones": { "stagger_ms": 150 }, "seed": 7 }"#,
    )
    .unwrap();
    assert_eq!(cfg.history.capacity, 12);
    assert_eq!(cfg.history.snapshot_scale, 1.0);
    assert_eq!(cfg.clones.stagger_ms, 150.0);
    assert_eq!(cfg.clones.spawn_duration_ms, 1000.0);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.particles, ParticleOpts::default());
}

#[test]
fn json_roundtrip_preserves_config() {
    let cfg = EngineConfig::default().with_quality(QualityTier::Low.settings());
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn invalid_values_are_rejected() {
    let bad = [
        r#"{ "history": { "capacity": 0 } }"#,
        r#"{ "history": { "snapshot_scale": 1.5 } }"#,
        r#"{ "clones": { "spawn_duration_ms": 0 } }"#,
        r#"{ "clones": { "stagger_ms": -1 } }"#,
        r#"{ "particles": { "drag": 1.2 } }"#,
        r#"{ "particles": { "life_min_ms": 900, "life_max_ms": 100 } }"#,
    ];
    for json in bad {
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("validation error"), "{json}: {err}");
    }
    let err = EngineConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("serialization error"));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = EngineConfig::from_path("target/definitely/missing/config.json").unwrap_err();
    assert!(err.to_string().contains("open engine config"));
}

#[test]
fn quality_tiers_scale_down_monotonically() {
    let low = QualityTier::Low.settings();
    let med = QualityTier::Medium.settings();
    let high = QualityTier::High.settings();
    assert!(low.max_clones < med.max_clones && med.max_clones < high.max_clones);
    assert!(low.ring_buffer_capacity < high.ring_buffer_capacity);
    assert!(low.snapshot_scale < high.snapshot_scale);
    assert_eq!("HIGH".parse::<QualityTier>().unwrap(), QualityTier::High);
    assert!("ultra".parse::<QualityTier>().is_err());
}

#[test]
fn with_quality_roundtrips_through_quality() {
    let q = QualityTier::Medium.settings();
    assert_eq!(EngineConfig::default().with_quality(q).quality(), q);
}
