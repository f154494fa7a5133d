pub mod aggregator;
pub mod metrics;
pub mod normalizer;
pub mod tuning;

use serde::{Deserialize, Serialize};

use crate::catalog::{ConflictGroup, DriveType, EngineFamily, ModCatalog, ModCategory};

pub use aggregator::{AggregationMode, CategoryGain, GainResult, aggregate};
pub use metrics::{DerivedMetrics, derive_metrics};
pub use normalizer::{ConflictResolution, NormalizedSelection, SuppressedKey, normalize};
pub use tuning::EngineTuning;

/// Stock profile of the car being computed. Supplied per call, never mutated.
///
/// Baseline figures are optional: their absence is a modeled case that
/// produces a warning and a zero baseline, not a silent default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarProfile {
    /// Stock crank horsepower
    pub hp: Option<f32>,
    /// Stock torque (lb-ft)
    pub torque: Option<f32>,
    /// Curb weight in pounds
    pub weight_lb: Option<f32>,
    /// Enables advanced (engine-family-aware) aggregation when present
    #[serde(default)]
    pub engine_family: Option<EngineFamily>,
    #[serde(default)]
    pub drive_type: DriveType,
}

/// Profile numerics after clamping, used internally by the aggregator and
/// metrics calculator. Missing or invalid values clamp to zero; the matching
/// warnings are produced separately by [`CarProfile::numeric_warnings`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct SanitizedProfile {
    pub hp: f32,
    pub torque: f32,
    pub weight_lb: f32,
}

impl CarProfile {
    fn clamp_baseline(value: Option<f32>) -> f32 {
        match value {
            Some(v) if v.is_finite() && v > 0. => v,
            _ => 0.,
        }
    }

    pub(crate) fn sanitized(&self) -> SanitizedProfile {
        SanitizedProfile {
            hp: Self::clamp_baseline(self.hp),
            torque: Self::clamp_baseline(self.torque),
            weight_lb: Self::clamp_baseline(self.weight_lb),
        }
    }

    /// Warnings for absent or invalid baseline numerics. Emitted once per
    /// computation so callers can decide whether to show a disclaimer.
    pub(crate) fn numeric_warnings(&self) -> Vec<ComputationWarning> {
        let mut warnings = Vec::new();
        for (field, value) in [
            ("hp", self.hp),
            ("torque", self.torque),
            ("weight_lb", self.weight_lb),
        ] {
            match value {
                None => warnings.push(ComputationWarning::MissingBaseline {
                    field: field.to_string(),
                }),
                Some(v) if !v.is_finite() || v < 0. => {
                    log::warn!("invalid stock {field} value {v}; clamping to 0");
                    warnings.push(ComputationWarning::InvalidNumericInput {
                        field: field.to_string(),
                        value: v,
                    });
                }
                Some(_) => {}
            }
        }
        warnings
    }
}

/// Non-fatal conditions accumulated during a computation.
///
/// Every failure mode in the engine degrades to one of these; the
/// computation itself always completes with a best-effort result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ComputationWarning {
    /// Selected key not present in the catalog; excluded from computation
    UnknownKey { key: String },
    /// Explicitly selected key already included by another selection
    RedundantSelection { key: String, included_by: String },
    /// Two selections in the same conflict group; the loser was removed
    ConflictResolved {
        winner: String,
        loser: String,
        group: ConflictGroup,
    },
    /// A category's summed gain exceeded its cap and was clamped
    CategoryCapped {
        category: ModCategory,
        uncapped: f32,
        cap: f32,
    },
    /// More than one modification in a category; later contributions were
    /// discounted
    DiminishingReturns {
        category: ModCategory,
        contributors: usize,
    },
    /// A baseline figure was NaN, infinite, or negative and was clamped to 0
    InvalidNumericInput { field: String, value: f32 },
    /// A baseline figure was absent; treated as a zero baseline
    MissingBaseline { field: String },
    /// Advanced mode requested without an engine family; basic mode was used
    AdvancedModeUnavailable,
}

impl std::fmt::Display for ComputationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputationWarning::UnknownKey { key } => {
                write!(f, "unknown modification key '{key}'")
            }
            ComputationWarning::RedundantSelection { key, included_by } => {
                write!(f, "'{key}' is redundant: already included by '{included_by}'")
            }
            ComputationWarning::ConflictResolved {
                winner,
                loser,
                group,
            } => {
                write!(f, "'{loser}' conflicts with '{winner}' ({group}); kept '{winner}'")
            }
            ComputationWarning::CategoryCapped {
                category,
                uncapped,
                cap,
            } => {
                write!(f, "{category} gains capped at {cap:.0} hp (uncapped sum {uncapped:.1})")
            }
            ComputationWarning::DiminishingReturns {
                category,
                contributors,
            } => {
                write!(
                    f,
                    "diminishing returns applied across {contributors} {category} modifications"
                )
            }
            ComputationWarning::InvalidNumericInput { field, value } => {
                write!(f, "invalid stock {field} value {value}; treated as 0")
            }
            ComputationWarning::MissingBaseline { field } => {
                write!(f, "stock {field} missing; treated as a zero baseline")
            }
            ComputationWarning::AdvancedModeUnavailable => {
                write!(f, "advanced mode requires an engine family; used basic mode")
            }
        }
    }
}

/// Combined output of the performance computation entry point.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceComputation {
    pub gain: GainResult,
    pub metrics: DerivedMetrics,
}

/// Run the full computation pipeline: resolve keys, normalize inclusions and
/// conflicts, aggregate gains, derive secondary metrics.
///
/// Deterministic: identical inputs always produce identical outputs, so
/// results are trivially cacheable by the caller. Never fails; all degraded
/// conditions surface as warnings on the gain result.
pub fn compute_performance(
    profile: &CarProfile,
    selected_keys: &[String],
    mode: AggregationMode,
    catalog: &ModCatalog,
    tuning: &EngineTuning,
) -> PerformanceComputation {
    let resolution = catalog.resolve(selected_keys);
    let normalized = normalize(&resolution.descriptors, catalog);
    let mut gain = aggregate(&normalized, profile, mode, tuning);

    // unknown-key warnings lead, in selection order
    let mut warnings: Vec<ComputationWarning> = resolution
        .unknown_keys
        .into_iter()
        .map(|key| ComputationWarning::UnknownKey { key })
        .collect();
    warnings.append(&mut gain.warnings);
    gain.warnings = warnings;

    let metrics = derive_metrics(profile, &gain, tuning);
    PerformanceComputation { gain, metrics }
}
