// End-to-end tests for the performance computation and lap estimation flows
//
// These drive the two public entry points the way a caller would: a stock
// profile plus selected upgrade keys through compute_performance, and a
// request plus a lap dataset through the tiered estimator.

use std::io::Write;

use moddyno::engine::{AggregationMode, ComputationWarning, EngineTuning, compute_performance};
use moddyno::lap::{
    InMemoryLapData, LapDataEntry, LapEstimateRequest, LapRecord, LapTimeEstimator, VehicleClass,
};
use moddyno::{CarProfile, DriverSkill, EstimateTier, ModCatalog, ModCategory};

fn stock_profile() -> CarProfile {
    CarProfile {
        hp: Some(300.),
        torque: Some(280.),
        weight_lb: Some(3200.),
        engine_family: None,
        drive_type: moddyno::DriveType::Rwd,
    }
}

fn keys(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_cold_air_intake_on_a_stock_300hp_car() {
    let catalog = ModCatalog::builtin();
    let tuning = EngineTuning::default();

    let computation = compute_performance(
        &stock_profile(),
        &keys(&["cold-air-intake"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );

    assert!(computation.gain.hp_gain >= 10. && computation.gain.hp_gain <= 15.);
    assert_eq!(computation.gain.categories.len(), 1);
    assert_eq!(
        computation.gain.categories[0].category,
        ModCategory::Intake
    );
    assert!(computation.gain.warnings.is_empty());
    assert!(computation.metrics.zero_to_sixty_delta_s < 0.);
}

#[test]
fn test_stage3_with_redundant_downpipe_counts_once() {
    let catalog = ModCatalog::builtin();
    let tuning = EngineTuning::default();
    let profile = stock_profile();

    let bundle_alone = compute_performance(
        &profile,
        &keys(&["stage3-tune"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );
    let with_redundant = compute_performance(
        &profile,
        &keys(&["stage3-tune", "downpipe"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );

    assert_eq!(
        bundle_alone.gain.hp_gain.to_bits(),
        with_redundant.gain.hp_gain.to_bits()
    );
    assert!(with_redundant.gain.warnings.iter().any(|w| matches!(
        w,
        ComputationWarning::RedundantSelection { key, included_by }
            if key == "downpipe" && included_by == "stage3-tune"
    )));
}

#[test]
fn test_mutually_exclusive_turbos_keep_only_the_winner() {
    let catalog = ModCatalog::builtin();
    let tuning = EngineTuning::default();

    let both = compute_performance(
        &stock_profile(),
        &keys(&["turbo-upgrade", "big-turbo"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );
    let winner_alone = compute_performance(
        &stock_profile(),
        &keys(&["big-turbo"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );

    let conflicts: Vec<&ComputationWarning> = both
        .gain
        .warnings
        .iter()
        .filter(|w| matches!(w, ComputationWarning::ConflictResolved { .. }))
        .collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        both.gain.hp_gain.to_bits(),
        winner_alone.gain.hp_gain.to_bits()
    );
}

#[test]
fn test_unknown_keys_warn_but_do_not_abort_the_build() {
    let catalog = ModCatalog::builtin();
    let tuning = EngineTuning::default();

    let computation = compute_performance(
        &stock_profile(),
        &keys(&["flux-capacitor", "cold-air-intake"]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );

    assert!(computation.gain.hp_gain >= 10.);
    assert_eq!(
        computation.gain.warnings,
        vec![ComputationWarning::UnknownKey {
            key: "flux-capacitor".to_string()
        }]
    );
}

#[test]
fn test_full_build_stays_within_category_caps() {
    let catalog = ModCatalog::builtin();
    let tuning = EngineTuning::default();

    let computation = compute_performance(
        &stock_profile(),
        &keys(&[
            "stage3-tune",
            "e85-conversion",
            "turboback-exhaust",
            "catback-exhaust",
            "coilovers",
            "lightweight-wheels",
            "weight-reduction",
            "big-brake-kit",
            "rear-wing",
        ]),
        AggregationMode::Basic,
        &catalog,
        &tuning,
    );

    for entry in &computation.gain.categories {
        let cap = tuning.category_cap(entry.category);
        assert!(
            entry.hp_gain <= cap + 1e-4,
            "{} exceeds its cap",
            entry.category
        );
    }
    assert!(computation.gain.weight_delta_lb < 0.);
    assert!(computation.metrics.braking_delta_ft < 0.);
    assert!(computation.metrics.lateral_g_delta < 0.);
}

#[test]
fn test_catalog_file_drives_the_same_pipeline() {
    let catalog = ModCatalog::builtin();
    let descriptors: Vec<_> = ["cold-air-intake", "downpipe"]
        .iter()
        .map(|k| catalog.get(k).unwrap().clone())
        .collect();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&descriptors).unwrap()).unwrap();
    file.flush().unwrap();

    let loaded = ModCatalog::from_json_file(file.path()).unwrap();
    assert_eq!(loaded.len(), 2);

    let computation = compute_performance(
        &stock_profile(),
        &keys(&["cold-air-intake"]),
        AggregationMode::Basic,
        &loaded,
        &EngineTuning::default(),
    );
    assert!(computation.gain.hp_gain >= 10. && computation.gain.hp_gain <= 15.);
}

#[test]
fn test_lap_estimate_from_a_jsonl_dataset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..12 {
        let entry = LapDataEntry::Record(LapRecord {
            track_id: "laguna-seca".to_string(),
            car_id: "gti-mk7".to_string(),
            lap_time_s: 101.5 + i as f32 * 0.25,
        });
        writeln!(file, "{}", serde_json::to_string(&entry).unwrap()).unwrap();
    }
    file.flush().unwrap();

    let data = InMemoryLapData::from_jsonl_file(file.path()).unwrap();
    let estimator = LapTimeEstimator::new(data, EngineTuning::default());
    let estimate = estimator.estimate(&LapEstimateRequest {
        track_id: "laguna-seca".to_string(),
        car_id: "gti-mk7".to_string(),
        vehicle_class: VehicleClass::SportCompact,
        drive_type: moddyno::DriveType::Fwd,
        stock_hp: 220.,
        current_hp: 292.,
        weight_lb: 3100.,
        driver_skill: DriverSkill::Intermediate,
        metrics: None,
    });

    assert_eq!(estimate.tier, EstimateTier::Statistical);
    assert_eq!(estimate.confidence, 0.9);
    assert!(estimate.estimated_seconds.is_some());
}

#[test]
fn test_lap_estimate_with_no_data_degrades_to_tier_4() {
    let estimator = LapTimeEstimator::new(InMemoryLapData::new(), EngineTuning::default());
    let estimate = estimator.estimate(&LapEstimateRequest {
        track_id: "nowhere-raceway".to_string(),
        car_id: "gti-mk7".to_string(),
        vehicle_class: VehicleClass::SportCompact,
        drive_type: moddyno::DriveType::Fwd,
        stock_hp: 220.,
        current_hp: 292.,
        weight_lb: 3100.,
        driver_skill: DriverSkill::Beginner,
        metrics: None,
    });

    assert_eq!(estimate.tier, EstimateTier::InsufficientData);
    assert_eq!(estimate.tier.grade(), 4);
    assert_eq!(estimate.estimated_seconds, None);
    assert_eq!(estimate.confidence, 0.);
}

#[test]
fn test_computation_output_serializes_for_callers() {
    let catalog = ModCatalog::builtin();
    let computation = compute_performance(
        &stock_profile(),
        &keys(&["stage2-tune", "coilovers"]),
        AggregationMode::Basic,
        &catalog,
        &EngineTuning::default(),
    );

    let json = serde_json::to_string_pretty(&computation).unwrap();
    assert!(json.contains("\"hp_gain\""));
    assert!(json.contains("\"zero_to_sixty_delta_s\""));
}
