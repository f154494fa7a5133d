// Secondary performance metrics derived from net gains
//
// A power-to-weight model relates the horsepower delta to acceleration;
// braking and lateral grip follow the chassis categories and mass change.
// All outputs are deltas against stock, negative meaning improvement, and
// every figure is clamped to a plausibility ceiling.

use serde::{Deserialize, Serialize};
use uom::si::f32::Mass;
use uom::si::mass::{kilogram, pound};

use crate::catalog::ModCategory;

use super::aggregator::GainResult;
use super::tuning::EngineTuning;
use super::CarProfile;

const BRAKING_CATEGORIES: [ModCategory; 1] = [ModCategory::Brakes];
const GRIP_CATEGORIES: [ModCategory; 3] = [
    ModCategory::Suspension,
    ModCategory::Aero,
    ModCategory::Wheels,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Change in the 0-60 mph time, seconds
    pub zero_to_sixty_delta_s: f32,
    /// Change in the 60-0 mph stopping distance, feet
    pub braking_delta_ft: f32,
    /// Change in sustained lateral grip, g (magnitude of the improvement)
    pub lateral_g_delta: f32,
}

/// Horsepower per metric tonne, the ratio both the 0-60 model and the lap
/// estimator scale against.
pub(crate) fn hp_per_tonne(hp: f32, weight_lb: f32) -> f32 {
    let kg = Mass::new::<pound>(weight_lb).get::<kilogram>();
    if kg <= 0. {
        return 0.;
    }
    hp / (kg / 1000.)
}

/// Derive acceleration, braking, and grip deltas from a gain result.
///
/// With no usable power or weight baseline the acceleration delta is zero;
/// the build still gets braking/grip credit because those depend only on the
/// modifications themselves and the weight fraction.
pub fn derive_metrics(
    profile: &CarProfile,
    gain: &GainResult,
    tuning: &EngineTuning,
) -> DerivedMetrics {
    let stock = profile.sanitized();

    let zero_to_sixty_delta_s = {
        let stock_pw = hp_per_tonne(stock.hp, stock.weight_lb);
        if stock_pw <= 0. {
            0.
        } else {
            let stock_time = tuning.zero_to_sixty_constant / stock_pw;
            let modded_pw = hp_per_tonne(
                stock.hp + gain.hp_gain,
                (stock.weight_lb + gain.weight_delta_lb).max(1.),
            );
            if modded_pw <= 0. {
                0.
            } else {
                let modded_time = tuning.zero_to_sixty_constant / modded_pw;
                let floor = -tuning.zero_to_sixty_max_improvement * stock_time;
                (modded_time - stock_time).clamp(floor, 0.)
            }
        }
    };

    let weight_fraction_removed = if stock.weight_lb > 0. {
        (-gain.weight_delta_lb / stock.weight_lb).max(0.)
    } else {
        0.
    };

    let braking_points = gain.handling_points_in(&BRAKING_CATEGORIES);
    let braking_delta_ft = -(braking_points * tuning.braking_per_point_ft
        + weight_fraction_removed * tuning.braking_weight_coefficient_ft)
        .clamp(0., tuning.braking_ceiling_ft);

    let grip_points = gain.handling_points_in(&GRIP_CATEGORIES);
    let lateral_g_delta = -(grip_points * tuning.lateral_g_per_point
        + weight_fraction_removed * tuning.lateral_g_weight_coefficient)
        .clamp(0., tuning.lateral_g_ceiling);

    DerivedMetrics {
        zero_to_sixty_delta_s,
        braking_delta_ft,
        lateral_g_delta,
    }
}
