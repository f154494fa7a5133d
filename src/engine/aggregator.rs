// Gain aggregation under diminishing returns and category caps

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::catalog::ModCategory;

use super::normalizer::NormalizedSelection;
use super::tuning::EngineTuning;
use super::{CarProfile, ComputationWarning};

/// How per-modification gains are drawn from their quoted ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Deterministic interpolation within each quoted range
    #[default]
    Basic,
    /// Basic gains rescaled by engine-family response multipliers; requires
    /// the profile to carry an engine family
    Advanced,
}

/// Gain credited to one category after diminishing returns and capping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGain {
    pub category: ModCategory,
    pub hp_gain: f32,
    pub torque_gain: f32,
    /// Summed chassis-effectiveness points; feeds the metrics calculator
    pub handling_points: f32,
    /// Whether the category cap clamped this entry
    pub capped: bool,
}

/// Net outcome of aggregating a normalized selection.
#[derive(Debug, Clone, Serialize)]
pub struct GainResult {
    pub hp_gain: f32,
    pub torque_gain: f32,
    /// Net curb weight change in pounds; negative means lighter
    pub weight_delta_lb: f32,
    /// Per-category breakdown in stable category order
    pub categories: Vec<CategoryGain>,
    pub warnings: Vec<ComputationWarning>,
}

impl GainResult {
    pub fn category(&self, category: ModCategory) -> Option<&CategoryGain> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Handling points summed over the given categories.
    pub(crate) fn handling_points_in(&self, categories: &[ModCategory]) -> f32 {
        self.categories
            .iter()
            .filter(|c| categories.contains(&c.category))
            .map(|c| c.handling_points)
            .sum()
    }
}

struct Contribution<'a> {
    key: &'a str,
    hp: f32,
    torque: f32,
}

/// Aggregate the active selections into net gains.
///
/// Never fails: malformed numerics clamp with a warning and the result is
/// always a best-effort figure. Deterministic for identical inputs.
pub fn aggregate(
    normalized: &NormalizedSelection,
    profile: &CarProfile,
    mode: AggregationMode,
    tuning: &EngineTuning,
) -> GainResult {
    let mut warnings = normalized.warnings.clone();
    warnings.extend(profile.numeric_warnings());

    let family = match mode {
        AggregationMode::Advanced => match profile.engine_family {
            Some(family) => Some(family),
            None => {
                log::debug!("advanced aggregation requested without an engine family");
                warnings.push(ComputationWarning::AdvancedModeUnavailable);
                None
            }
        },
        AggregationMode::Basic => None,
    };

    let interpolation = tuning.basic_interpolation;
    let mut buckets: BTreeMap<ModCategory, Vec<Contribution>> = BTreeMap::new();
    let mut handling: BTreeMap<ModCategory, f32> = BTreeMap::new();
    let mut weight_delta_lb = 0.;
    for descriptor in &normalized.active {
        let mut hp = descriptor.hp_gain.at(interpolation);
        let mut torque = descriptor.torque_gain.at(interpolation);
        if let Some(family) = family {
            let multiplier = family.response_multiplier(descriptor.category);
            hp *= multiplier;
            torque *= multiplier;
        }
        buckets.entry(descriptor.category).or_default().push(Contribution {
            key: &descriptor.key,
            hp,
            torque,
        });
        *handling.entry(descriptor.category).or_insert(0.) += descriptor.handling_points;
        weight_delta_lb += descriptor.weight_delta_lb;
    }

    let decay = 1. - tuning.diminishing_factor;
    let mut categories = Vec::with_capacity(buckets.len());
    for (category, contributions) in buckets {
        // largest contribution counts in full; each later one is discounted
        // geometrically
        let ranked = contributions
            .into_iter()
            .sorted_by(|a, b| {
                b.hp.partial_cmp(&a.hp)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.key.cmp(b.key))
            })
            .collect::<Vec<_>>();
        if ranked.len() > 1 {
            warnings.push(ComputationWarning::DiminishingReturns {
                category,
                contributors: ranked.len(),
            });
        }
        let mut hp_sum = 0.;
        let mut torque_sum = 0.;
        for (rank, contribution) in ranked.iter().enumerate() {
            let discount = decay.powi(rank as i32);
            hp_sum += contribution.hp * discount;
            torque_sum += contribution.torque * discount;
        }

        let cap = tuning.category_cap(category);
        let capped = hp_sum > cap || torque_sum > cap;
        if capped {
            warnings.push(ComputationWarning::CategoryCapped {
                category,
                uncapped: hp_sum.max(torque_sum),
                cap,
            });
        }
        categories.push(CategoryGain {
            category,
            hp_gain: hp_sum.min(cap),
            torque_gain: torque_sum.min(cap),
            handling_points: handling.get(&category).copied().unwrap_or(0.),
            capped,
        });
    }

    GainResult {
        hp_gain: categories.iter().map(|c| c.hp_gain).sum(),
        torque_gain: categories.iter().map(|c| c.torque_gain).sum(),
        weight_delta_lb,
        categories,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DriveType, EngineFamily, ModCatalog};
    use crate::engine::normalizer::normalize;

    fn profile() -> CarProfile {
        CarProfile {
            hp: Some(300.),
            torque: Some(280.),
            weight_lb: Some(3200.),
            engine_family: None,
            drive_type: DriveType::Rwd,
        }
    }

    fn turbo_profile() -> CarProfile {
        CarProfile {
            engine_family: Some(EngineFamily::TurboInline4),
            ..profile()
        }
    }

    fn aggregate_keys(
        catalog: &ModCatalog,
        keys: &[&str],
        profile: &CarProfile,
        mode: AggregationMode,
        tuning: &EngineTuning,
    ) -> GainResult {
        let explicit: Vec<_> = keys.iter().map(|k| catalog.get(k).unwrap()).collect();
        let normalized = normalize(&explicit, catalog);
        aggregate(&normalized, profile, mode, tuning)
    }

    #[test]
    fn test_single_intake_lands_in_quoted_range() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        let result = aggregate_keys(
            &catalog,
            &["cold-air-intake"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );

        assert!(result.hp_gain >= 10. && result.hp_gain <= 15.);
        assert_eq!(result.categories.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_basic_mode_uses_the_interpolation_point() {
        let catalog = ModCatalog::builtin();
        let mut tuning = EngineTuning::default();
        tuning.basic_interpolation = 0.;
        let low = aggregate_keys(
            &catalog,
            &["cold-air-intake"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );
        assert_eq!(low.hp_gain, 10.);

        tuning.basic_interpolation = 1.;
        let high = aggregate_keys(
            &catalog,
            &["cold-air-intake"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );
        assert_eq!(high.hp_gain, 15.);
    }

    #[test]
    fn test_second_category_member_is_discounted() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        // downpipe (mid 15) and catback (mid 11) share the exhaust category
        let both = aggregate_keys(
            &catalog,
            &["downpipe", "catback-exhaust"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );
        let downpipe_alone = aggregate_keys(
            &catalog,
            &["downpipe"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );

        let added = both.hp_gain - downpipe_alone.hp_gain;
        // catback contributes, but less than its standalone midpoint of 11
        assert!(added > 0.);
        assert!(added < 11.);
        assert!((added - 11. * 0.7).abs() < 1e-3);
        assert!(both
            .warnings
            .iter()
            .any(|w| matches!(w, ComputationWarning::DiminishingReturns { .. })));
    }

    #[test]
    fn test_category_cap_clamps_and_warns() {
        let catalog = ModCatalog::builtin();
        let mut tuning = EngineTuning::default();
        tuning.category_caps_hp.insert(ModCategory::Exhaust, 18.);
        let result = aggregate_keys(
            &catalog,
            &["downpipe", "catback-exhaust"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );

        let exhaust = result.category(ModCategory::Exhaust).unwrap();
        assert_eq!(exhaust.hp_gain, 18.);
        assert!(exhaust.capped);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, ComputationWarning::CategoryCapped { .. })));
    }

    #[test]
    fn test_advanced_mode_scales_by_engine_family() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        let basic = aggregate_keys(
            &catalog,
            &["stage1-tune"],
            &turbo_profile(),
            AggregationMode::Basic,
            &tuning,
        );
        let advanced = aggregate_keys(
            &catalog,
            &["stage1-tune"],
            &turbo_profile(),
            AggregationMode::Advanced,
            &tuning,
        );

        // turbo inline-4 calibrations respond at 1.45x
        assert!((advanced.hp_gain - basic.hp_gain * 1.45).abs() < 1e-3);
    }

    #[test]
    fn test_advanced_mode_without_family_degrades_to_basic() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        let result = aggregate_keys(
            &catalog,
            &["stage1-tune"],
            &profile(),
            AggregationMode::Advanced,
            &tuning,
        );
        let basic = aggregate_keys(
            &catalog,
            &["stage1-tune"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );

        assert_eq!(result.hp_gain, basic.hp_gain);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, ComputationWarning::AdvancedModeUnavailable)));
    }

    #[test]
    fn test_missing_baseline_still_computes_gains() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        let bare = CarProfile {
            hp: None,
            torque: None,
            weight_lb: None,
            engine_family: None,
            drive_type: DriveType::Rwd,
        };
        let result = aggregate_keys(
            &catalog,
            &["cold-air-intake"],
            &bare,
            AggregationMode::Basic,
            &tuning,
        );

        assert!(result.hp_gain > 0.);
        assert_eq!(
            result
                .warnings
                .iter()
                .filter(|w| matches!(w, ComputationWarning::MissingBaseline { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_weight_deltas_sum_across_selections() {
        let catalog = ModCatalog::builtin();
        let tuning = EngineTuning::default();
        let result = aggregate_keys(
            &catalog,
            &["weight-reduction", "carbon-hood"],
            &profile(),
            AggregationMode::Basic,
            &tuning,
        );
        assert_eq!(result.weight_delta_lb, -205.);
    }
}
