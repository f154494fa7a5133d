// Confidence-tiered lap-time estimation
//
// A strict fall-through over four estimate tiers: real recorded statistics,
// professional reference scaling, similar-vehicle interpolation, and an
// insufficient-data terminal. Driver skill modulates only the
// modification-derived component of an estimate; the stock baseline is
// never skill-adjusted.

pub mod data;

use serde::{Deserialize, Serialize};

use crate::catalog::DriveType;
use crate::engine::metrics::hp_per_tonne;
use crate::engine::{DerivedMetrics, EngineTuning};

pub use data::{
    InMemoryLapData, LapDataEntry, LapDataSource, LapRecord, ReferenceLap, SimilarVehicleLap,
    VehicleClass,
};

/// Recorded laps required before the statistical tier applies.
const MIN_STATISTICAL_SAMPLES: usize = 10;

/// Driver skill levels and their extraction factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverSkill {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl DriverSkill {
    /// Fraction of a build's theoretical benefit a driver of this skill
    /// actually realizes on track.
    pub fn extraction_factor(&self) -> f32 {
        match self {
            DriverSkill::Beginner => 0.4,
            DriverSkill::Intermediate => 0.6,
            DriverSkill::Advanced => 0.8,
            DriverSkill::Professional => 0.95,
        }
    }

    pub fn insight(&self) -> &'static str {
        match self {
            DriverSkill::Beginner => {
                "Most of this build's potential is still on the table. Seat time and coaching will cut more lap time than the next part."
            }
            DriverSkill::Intermediate => {
                "You will feel the larger gains. Consistent braking points will unlock the rest of the build."
            }
            DriverSkill::Advanced => {
                "You can extract most of the added performance. Focus on carrying the extra speed through the fast sections."
            }
            DriverSkill::Professional => {
                "Near-complete extraction of the build's potential. The remaining limit is the hardware."
            }
        }
    }
}

impl std::fmt::Display for DriverSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverSkill::Beginner => write!(f, "Beginner"),
            DriverSkill::Intermediate => write!(f, "Intermediate"),
            DriverSkill::Advanced => write!(f, "Advanced"),
            DriverSkill::Professional => write!(f, "Professional"),
        }
    }
}

/// Confidence grade of a lap estimate, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimateTier {
    /// Aggregated from real recorded laps of this car/track combination
    Statistical,
    /// Scaled from a professional reference lap by power-to-weight
    ReferenceScaled,
    /// Interpolated from a structurally similar vehicle's established time
    Interpolated,
    /// No usable data; no numeric estimate is produced
    InsufficientData,
}

impl EstimateTier {
    /// Numeric grade, 1 (highest confidence) through 4.
    pub fn grade(&self) -> u8 {
        match self {
            EstimateTier::Statistical => 1,
            EstimateTier::ReferenceScaled => 2,
            EstimateTier::Interpolated => 3,
            EstimateTier::InsufficientData => 4,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            EstimateTier::Statistical => 0.9,
            EstimateTier::ReferenceScaled => 0.8,
            EstimateTier::Interpolated => 0.65,
            EstimateTier::InsufficientData => 0.,
        }
    }
}

impl std::fmt::Display for EstimateTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateTier::Statistical => write!(f, "Tier 1 (statistical)"),
            EstimateTier::ReferenceScaled => write!(f, "Tier 2 (reference-scaled)"),
            EstimateTier::Interpolated => write!(f, "Tier 3 (similar-vehicle)"),
            EstimateTier::InsufficientData => write!(f, "Tier 4 (insufficient data)"),
        }
    }
}

/// Inputs for one lap-time estimation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapEstimateRequest {
    pub track_id: String,
    pub car_id: String,
    pub vehicle_class: VehicleClass,
    #[serde(default)]
    pub drive_type: DriveType,
    pub stock_hp: f32,
    pub current_hp: f32,
    pub weight_lb: f32,
    pub driver_skill: DriverSkill,
    /// Derived metrics of the build, when the caller already computed them;
    /// sharpens the modification component of the estimate
    #[serde(default)]
    pub metrics: Option<DerivedMetrics>,
}

/// A graded lap-time prediction. Terminal output; there are no further
/// transitions.
#[derive(Debug, Clone, Serialize)]
pub struct LapEstimate {
    pub track_id: String,
    /// Absent for tier 4
    pub estimated_seconds: Option<f32>,
    pub tier: EstimateTier,
    pub confidence: f32,
    pub driver_skill_insight: String,
}

/// Tiered lap-time estimator over a caller-supplied data source.
pub struct LapTimeEstimator<D: LapDataSource> {
    data: D,
    tuning: EngineTuning,
}

impl<D: LapDataSource> LapTimeEstimator<D> {
    pub fn new(data: D, tuning: EngineTuning) -> Self {
        Self { data, tuning }
    }

    /// Produce the best-tier estimate the data allows.
    ///
    /// Tiers are attempted strictly in order; a tier is skipped only when
    /// its preconditions fail. Running out of data is not an error: the
    /// result is a valid tier-4 outcome with no numeric estimate.
    pub fn estimate(&self, request: &LapEstimateRequest) -> LapEstimate {
        let tier = self
            .statistical(request)
            .or_else(|| self.reference_scaled(request))
            .or_else(|| self.interpolated(request));

        match tier {
            Some((tier, seconds)) => LapEstimate {
                track_id: request.track_id.clone(),
                estimated_seconds: Some(seconds),
                tier,
                confidence: tier.confidence(),
                driver_skill_insight: request.driver_skill.insight().to_string(),
            },
            None => {
                log::debug!(
                    "no lap data for '{}' at '{}'; returning tier 4",
                    request.car_id,
                    request.track_id
                );
                LapEstimate {
                    track_id: request.track_id.clone(),
                    estimated_seconds: None,
                    tier: EstimateTier::InsufficientData,
                    confidence: EstimateTier::InsufficientData.confidence(),
                    driver_skill_insight: request.driver_skill.insight().to_string(),
                }
            }
        }
    }

    /// Lap seconds the build is worth on top of a stock baseline, before
    /// skill extraction. Always non-positive.
    fn modification_delta(&self, baseline_s: f32, request: &LapEstimateRequest) -> f32 {
        let delta = if let Some(metrics) = &request.metrics {
            metrics.zero_to_sixty_delta_s * self.tuning.lap_seconds_per_sixty_second
                + metrics.lateral_g_delta * self.tuning.lap_seconds_per_g
        } else if request.stock_hp > 0. && request.current_hp > 0. {
            baseline_s
                * ((request.stock_hp / request.current_hp)
                    .powf(self.tuning.lap_sensitivity_exponent)
                    - 1.)
        } else {
            0.
        };
        delta.min(0.)
    }

    fn skill_adjusted(&self, stock_baseline_s: f32, request: &LapEstimateRequest) -> f32 {
        let delta = self.modification_delta(stock_baseline_s, request);
        stock_baseline_s + delta * request.driver_skill.extraction_factor()
    }

    fn statistical(&self, request: &LapEstimateRequest) -> Option<(EstimateTier, f32)> {
        let laps = self.data.recorded_laps(&request.track_id, &request.car_id);
        if laps.len() < MIN_STATISTICAL_SAMPLES {
            log::debug!(
                "{} recorded laps, need {}; falling through",
                laps.len(),
                MIN_STATISTICAL_SAMPLES
            );
            return None;
        }
        let baseline = median(laps)?;
        Some((
            EstimateTier::Statistical,
            self.skill_adjusted(baseline, request),
        ))
    }

    fn reference_scaled(&self, request: &LapEstimateRequest) -> Option<(EstimateTier, f32)> {
        let reference = self
            .data
            .reference_lap(&request.track_id, request.vehicle_class)?;
        let reference_pw = hp_per_tonne(reference.hp, reference.weight_lb);
        let stock_pw = hp_per_tonne(request.stock_hp, request.weight_lb);
        if reference.lap_time_s <= 0. || reference_pw <= 0. || stock_pw <= 0. {
            return None;
        }
        let baseline = reference.lap_time_s
            * (reference_pw / stock_pw).powf(self.tuning.lap_sensitivity_exponent);
        Some((
            EstimateTier::ReferenceScaled,
            self.skill_adjusted(baseline, request),
        ))
    }

    fn interpolated(&self, request: &LapEstimateRequest) -> Option<(EstimateTier, f32)> {
        let similar = self.data.similar_vehicle_lap(
            &request.track_id,
            request.vehicle_class,
            request.drive_type,
        )?;
        let similar_pw = hp_per_tonne(similar.hp, similar.weight_lb);
        let stock_pw = hp_per_tonne(request.stock_hp, request.weight_lb);
        if similar.lap_time_s <= 0. || similar_pw <= 0. || stock_pw <= 0. {
            return None;
        }
        let baseline = similar.lap_time_s
            * (similar_pw / stock_pw).powf(self.tuning.lap_sensitivity_exponent);
        Some((
            EstimateTier::Interpolated,
            self.skill_adjusted(baseline, request),
        ))
    }
}

/// Median of the samples; `None` when empty.
fn median(mut samples: Vec<f32>) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        Some((samples[mid - 1] + samples[mid]) / 2.)
    } else {
        Some(samples[mid])
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_skill() -> impl Strategy<Value = DriverSkill> {
        prop_oneof![
            Just(DriverSkill::Beginner),
            Just(DriverSkill::Intermediate),
            Just(DriverSkill::Advanced),
            Just(DriverSkill::Professional),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // once the statistical precondition holds, the estimator never
        // falls through to a lower tier
        #[test]
        fn prop_tier_1_precondition_wins(
            lap_count in 10usize..40,
            base_lap in 60.0f32..200.,
            stock_hp in 80.0f32..500.,
            gain in 0.0f32..300.,
            skill in arb_skill(),
        ) {
            let entries: Vec<LapDataEntry> = (0..lap_count)
                .map(|i| LapDataEntry::Record(LapRecord {
                    track_id: "track".to_string(),
                    car_id: "car".to_string(),
                    lap_time_s: base_lap + (i % 7) as f32 * 0.3,
                }))
                .collect();
            let estimator = LapTimeEstimator::new(
                InMemoryLapData::from_entries(entries),
                EngineTuning::default(),
            );
            let request = LapEstimateRequest {
                track_id: "track".to_string(),
                car_id: "car".to_string(),
                vehicle_class: VehicleClass::Sports,
                drive_type: DriveType::Rwd,
                stock_hp,
                current_hp: stock_hp + gain,
                weight_lb: 3000.,
                driver_skill: skill,
                metrics: None,
            };

            let estimate = estimator.estimate(&request);
            prop_assert_eq!(estimate.tier, EstimateTier::Statistical);
            prop_assert!(estimate.estimated_seconds.is_some());
            // modifications never make the estimate slower than the baseline
            prop_assert!(estimate.estimated_seconds.unwrap() <= base_lap + 2.);
        }

        // estimation is deterministic for identical inputs
        #[test]
        fn prop_estimation_is_deterministic(
            stock_hp in 80.0f32..500.,
            gain in 0.0f32..300.,
            skill in arb_skill(),
        ) {
            let entries: Vec<LapDataEntry> = (0..12)
                .map(|i| LapDataEntry::Record(LapRecord {
                    track_id: "track".to_string(),
                    car_id: "car".to_string(),
                    lap_time_s: 100. + i as f32 * 0.25,
                }))
                .collect();
            let estimator = LapTimeEstimator::new(
                InMemoryLapData::from_entries(entries),
                EngineTuning::default(),
            );
            let request = LapEstimateRequest {
                track_id: "track".to_string(),
                car_id: "car".to_string(),
                vehicle_class: VehicleClass::Sports,
                drive_type: DriveType::Rwd,
                stock_hp,
                current_hp: stock_hp + gain,
                weight_lb: 3000.,
                driver_skill: skill,
                metrics: None,
            };

            let first = estimator.estimate(&request);
            let second = estimator.estimate(&request);
            prop_assert_eq!(
                first.estimated_seconds.map(f32::to_bits),
                second.estimated_seconds.map(f32::to_bits)
            );
            prop_assert_eq!(first.tier, second.tier);
        }
    }
}
