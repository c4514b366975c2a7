use crate::config::{EngineConfig, IntegratorMode, Thresholds};
use crate::reconcile::HierarchyReconciler;

#[test]
fn test_defaults() {
    let config = EngineConfig::default();

    assert_eq!(config.integrator, IntegratorMode::VerletNBody);
    assert_eq!(config.periodic_interval(), 60);
    assert!(!config.promote_root_in_keplerian);
    assert_eq!(config.thresholds.star_dominance_ratio, 3.0);
    assert_eq!(config.thresholds.moon_decay_rate, 10.0);
    assert_eq!(config.thresholds.moon_decay_onset_au, 0.1);
}

#[test]
fn test_n_body_modes() {
    assert!(!IntegratorMode::TwoBodyKeplerian.is_n_body());
    assert!(IntegratorMode::SymplecticNBody.is_n_body());
    assert!(IntegratorMode::VerletNBody.is_n_body());
}

#[test]
fn test_periodic_interval_is_never_zero() {
    let config = EngineConfig::default().with_periodic_interval(0);
    assert_eq!(config.periodic_interval(), 1);
}

#[test]
fn test_partial_json_falls_back_to_defaults() {
    let config: EngineConfig = serde_json::from_str(
        r#"{
            "integrator": "two-body-keplerian",
            "thresholds": { "escapeHysteresis": 3.0 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.integrator, IntegratorMode::TwoBodyKeplerian);
    assert_eq!(config.periodic_interval_ticks, 60);
    assert_eq!(config.thresholds.escape_hysteresis, 3.0);
    assert_eq!(config.thresholds.planet_reassign_hysteresis, 1.5);
}

#[test]
fn test_empty_json_is_default() {
    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_unknown_integrator_is_rejected() {
    let result = serde_json::from_str::<EngineConfig>(r#"{ "integrator": "runge-kutta" }"#);
    assert!(result.is_err());
}

#[test]
fn test_reconciler_picks_up_config() {
    let thresholds = Thresholds {
        escape_hysteresis: 4.0,
        ..Thresholds::default()
    };
    let config = EngineConfig::default()
        .with_integrator(IntegratorMode::SymplecticNBody)
        .with_thresholds(thresholds)
        .with_root_promotion_in_keplerian(true);

    let reconciler = HierarchyReconciler::from_config(&config);

    assert_eq!(reconciler.selector.mode, IntegratorMode::SymplecticNBody);
    assert_eq!(reconciler.thresholds().escape_hysteresis, 4.0);
    assert!(reconciler.selector.promote_root_in_keplerian);
}
