// Consolidated tuning constants for the computation engine
//
// Every empirical constant the engine uses lives here, injected into the
// aggregator, metrics calculator, and lap estimator. The structure can be
// overridden from a JSON file in the user config directory so output
// expectations can be validated against real data without recompiling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::ModCategory;
use crate::errors::ModdynoError;

const TUNING_FILE_NAME: &str = "tuning.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineTuning {
    /// Interpolation point within each [low, high] gain range in basic mode.
    /// 0.5 is the midpoint.
    pub basic_interpolation: f32,
    /// Discount factor for stacked same-category modifications: the n-th
    /// largest contributor is scaled by (1 - factor)^n.
    pub diminishing_factor: f32,
    /// Per-category horsepower caps; categories absent here use
    /// `default_category_cap_hp`.
    pub category_caps_hp: HashMap<ModCategory, f32>,
    pub default_category_cap_hp: f32,

    /// Power-to-weight constant for the 0-60 model: estimated seconds =
    /// constant / (hp per metric tonne).
    pub zero_to_sixty_constant: f32,
    /// Largest believable 0-60 improvement as a fraction of the stock time
    pub zero_to_sixty_max_improvement: f32,
    /// 60-0 braking distance improvement per brake handling point (feet)
    pub braking_per_point_ft: f32,
    /// 60-0 braking distance improvement per unit of weight fraction removed
    pub braking_weight_coefficient_ft: f32,
    /// Largest believable braking distance improvement (feet)
    pub braking_ceiling_ft: f32,
    /// Lateral-g improvement per suspension/aero/wheels handling point
    pub lateral_g_per_point: f32,
    /// Lateral-g improvement per unit of weight fraction removed
    pub lateral_g_weight_coefficient: f32,
    /// Largest believable lateral-g improvement
    pub lateral_g_ceiling: f32,

    /// Exponent relating power-to-weight ratio changes to lap time changes
    pub lap_sensitivity_exponent: f32,
    /// Lap seconds gained per second of 0-60 improvement
    pub lap_seconds_per_sixty_second: f32,
    /// Lap seconds gained per g of added lateral grip
    pub lap_seconds_per_g: f32,
}

impl Default for EngineTuning {
    fn default() -> Self {
        let category_caps_hp = HashMap::from([
            (ModCategory::Intake, 20.),
            (ModCategory::Exhaust, 35.),
            (ModCategory::Turbo, 120.),
            (ModCategory::Intercooler, 20.),
            (ModCategory::Fueling, 50.),
            (ModCategory::Tune, 120.),
            (ModCategory::Suspension, 5.),
            (ModCategory::Brakes, 5.),
            (ModCategory::Weight, 5.),
            (ModCategory::Aero, 5.),
            (ModCategory::Wheels, 5.),
        ]);
        Self {
            basic_interpolation: 0.5,
            diminishing_factor: 0.3,
            category_caps_hp,
            default_category_cap_hp: 60.,
            zero_to_sixty_constant: 1150.,
            zero_to_sixty_max_improvement: 0.5,
            braking_per_point_ft: 1.2,
            braking_weight_coefficient_ft: 40.,
            braking_ceiling_ft: 25.,
            lateral_g_per_point: 0.012,
            lateral_g_weight_coefficient: 0.3,
            lateral_g_ceiling: 0.35,
            lap_sensitivity_exponent: 0.33,
            lap_seconds_per_sixty_second: 1.8,
            lap_seconds_per_g: 9.,
        }
    }
}

impl EngineTuning {
    /// Cap for a category's summed gain. Total over all categories.
    pub fn category_cap(&self, category: ModCategory) -> f32 {
        self.category_caps_hp
            .get(&category)
            .copied()
            .unwrap_or(self.default_category_cap_hp)
    }

    pub fn from_local_file() -> Option<Self> {
        let tuning_path = dirs::config_dir()?.join("moddyno").join(TUNING_FILE_NAME);

        if tuning_path.exists() {
            let file = std::fs::File::open(tuning_path).expect("Could not open tuning file");
            Some(serde_json::from_reader(file).expect("Could not parse tuning file"))
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), ModdynoError> {
        let tuning_path = dirs::config_dir()
            .ok_or(ModdynoError::NoConfigDir)?
            .join("moddyno")
            .join(TUNING_FILE_NAME);

        if !tuning_path.exists() {
            std::fs::create_dir_all(tuning_path.parent().unwrap())
                .map_err(|e| ModdynoError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(tuning_path)
            .map_err(|e| ModdynoError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| ModdynoError::ConfigSerializeError { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caps_cover_every_category() {
        let tuning = EngineTuning::default();
        for category in ModCategory::ALL {
            assert!(tuning.category_cap(category) > 0.);
        }
    }

    #[test]
    fn test_unlisted_category_falls_back_to_default_cap() {
        let mut tuning = EngineTuning::default();
        tuning.category_caps_hp.remove(&ModCategory::Turbo);
        assert_eq!(
            tuning.category_cap(ModCategory::Turbo),
            tuning.default_category_cap_hp
        );
    }

    #[test]
    fn test_partial_tuning_file_fills_in_defaults() {
        let tuning: EngineTuning =
            serde_json::from_str(r#"{ "diminishing_factor": 0.4 }"#).unwrap();
        assert_eq!(tuning.diminishing_factor, 0.4);
        assert_eq!(
            tuning.basic_interpolation,
            EngineTuning::default().basic_interpolation
        );
    }
}
