// Core data types for the modification catalog

use serde::{Deserialize, Serialize};

/// Performance category a modification belongs to.
///
/// Categories drive diminishing returns and per-category caps: stacking
/// several modifications in the same category credits progressively less.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModCategory {
    /// Air intake hardware (filters, cold-air kits)
    Intake,
    /// Exhaust hardware from the turbo/manifold back
    Exhaust,
    /// Turbocharger and boost hardware
    Turbo,
    /// Charge cooling (intercoolers, heat exchangers)
    Intercooler,
    /// Fuel system upgrades and fuel conversions
    Fueling,
    /// ECU calibrations and staged software packages
    Tune,
    /// Springs, dampers, and anti-roll hardware
    Suspension,
    /// Brake hardware
    Brakes,
    /// Mass removal (interior, panels, batteries)
    Weight,
    /// Downforce-producing bodywork
    Aero,
    /// Wheels and tires
    Wheels,
}

impl ModCategory {
    /// Every category, in the stable order used for reporting.
    pub const ALL: [ModCategory; 11] = [
        ModCategory::Intake,
        ModCategory::Exhaust,
        ModCategory::Turbo,
        ModCategory::Intercooler,
        ModCategory::Fueling,
        ModCategory::Tune,
        ModCategory::Suspension,
        ModCategory::Brakes,
        ModCategory::Weight,
        ModCategory::Aero,
        ModCategory::Wheels,
    ];

    /// Whether gains in this category come from added engine output rather
    /// than chassis behavior.
    pub fn is_power_category(&self) -> bool {
        matches!(
            self,
            ModCategory::Intake
                | ModCategory::Exhaust
                | ModCategory::Turbo
                | ModCategory::Intercooler
                | ModCategory::Fueling
                | ModCategory::Tune
        )
    }
}

impl std::fmt::Display for ModCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModCategory::Intake => write!(f, "Intake"),
            ModCategory::Exhaust => write!(f, "Exhaust"),
            ModCategory::Turbo => write!(f, "Turbo"),
            ModCategory::Intercooler => write!(f, "Intercooler"),
            ModCategory::Fueling => write!(f, "Fueling"),
            ModCategory::Tune => write!(f, "Tune"),
            ModCategory::Suspension => write!(f, "Suspension"),
            ModCategory::Brakes => write!(f, "Brakes"),
            ModCategory::Weight => write!(f, "Weight"),
            ModCategory::Aero => write!(f, "Aero"),
            ModCategory::Wheels => write!(f, "Wheels"),
        }
    }
}

/// Mutually exclusive hardware groups.
///
/// At most one member of a group can be active in a build; the normalizer
/// resolves multiple selections deterministically by hierarchy rank.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictGroup {
    /// Staged ECU calibrations (stage 1/2/3)
    TuneStage,
    /// Turbocharger units
    TurboHardware,
    /// Full exhaust systems
    ExhaustSystem,
    /// Intake systems
    IntakeSystem,
    /// Complete suspension packages
    SuspensionKit,
    /// Brake packages
    BrakeKit,
}

impl std::fmt::Display for ConflictGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictGroup::TuneStage => write!(f, "Tune Stage"),
            ConflictGroup::TurboHardware => write!(f, "Turbo Hardware"),
            ConflictGroup::ExhaustSystem => write!(f, "Exhaust System"),
            ConflictGroup::IntakeSystem => write!(f, "Intake System"),
            ConflictGroup::SuspensionKit => write!(f, "Suspension Kit"),
            ConflictGroup::BrakeKit => write!(f, "Brake Kit"),
        }
    }
}

/// Engine families with known modification headroom.
///
/// Advanced aggregation scales gains by how strongly a family responds to a
/// category: forced-induction engines gain far more from calibration and
/// supporting hardware than naturally aspirated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineFamily {
    TurboInline4,
    TurboInline6,
    TurboV6,
    TurboFlat6,
    NaInline4,
    NaV6,
    NaV8,
}

impl EngineFamily {
    pub fn is_forced_induction(&self) -> bool {
        matches!(
            self,
            EngineFamily::TurboInline4
                | EngineFamily::TurboInline6
                | EngineFamily::TurboV6
                | EngineFamily::TurboFlat6
        )
    }

    /// Headroom left in the stock calibration. Small-displacement turbo
    /// engines ship the most conservative factory maps.
    fn tune_headroom(&self) -> f32 {
        match self {
            EngineFamily::TurboInline4 => 1.45,
            EngineFamily::TurboInline6 => 1.35,
            EngineFamily::TurboV6 => 1.3,
            EngineFamily::TurboFlat6 => 1.25,
            EngineFamily::NaInline4 => 0.55,
            EngineFamily::NaV6 => 0.5,
            EngineFamily::NaV8 => 0.6,
        }
    }

    /// Multiplier applied to a category's gains in advanced aggregation.
    pub fn response_multiplier(&self, category: ModCategory) -> f32 {
        match category {
            ModCategory::Tune | ModCategory::Turbo | ModCategory::Fueling => self.tune_headroom(),
            ModCategory::Intercooler => {
                if self.is_forced_induction() {
                    1.2
                } else {
                    // nothing to intercool
                    0.1
                }
            }
            ModCategory::Intake | ModCategory::Exhaust => {
                if self.is_forced_induction() {
                    1.1
                } else {
                    0.9
                }
            }
            // chassis categories respond the same regardless of engine
            _ => 1.0,
        }
    }
}

/// Drivetrain layout of the car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriveType {
    Fwd,
    #[default]
    Rwd,
    Awd,
}

impl std::fmt::Display for DriveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveType::Fwd => write!(f, "FWD"),
            DriveType::Rwd => write!(f, "RWD"),
            DriveType::Awd => write!(f, "AWD"),
        }
    }
}

/// Inclusive low/high gain range quoted for a modification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GainRange {
    pub low: f32,
    pub high: f32,
}

impl GainRange {
    pub const ZERO: GainRange = GainRange { low: 0., high: 0. };

    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Deterministic interpolation within the range. `t` is clamped to
    /// [0, 1]; 0.5 is the midpoint.
    pub fn at(&self, t: f32) -> f32 {
        self.low + (self.high - self.low) * t.clamp(0., 1.)
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

/// Static descriptor for one modification in the catalog.
///
/// Descriptors are immutable once loaded; the catalog owns them. The
/// `included_keys` edges form a directed inclusion graph: a staged package
/// subsumes the hardware it lists, and the normalizer expands the transitive
/// closure so subsumed selections are never double counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModDescriptor {
    /// Unique key, e.g. "stage3-tune"
    pub key: String,
    /// Human-readable name for display
    pub name: String,
    pub category: ModCategory,
    /// Quoted crank horsepower gain range
    pub hp_gain: GainRange,
    /// Quoted torque gain range (lb-ft)
    #[serde(default)]
    pub torque_gain: GainRange,
    /// Keys this modification subsumes (e.g. a stage 3 tune includes the
    /// downpipe, intake, turbo upgrade, and intercooler it requires)
    #[serde(default)]
    pub included_keys: Vec<String>,
    /// Higher rank subsumes lower within the same family and wins conflicts
    #[serde(default)]
    pub hierarchy_rank: u8,
    /// Group of mutually exclusive hardware this belongs to, if any
    #[serde(default)]
    pub conflict_group: Option<ConflictGroup>,
    /// Curb weight change in pounds; negative means mass removed
    #[serde(default)]
    pub weight_delta_lb: f32,
    /// Chassis-effectiveness points feeding braking/grip estimates
    #[serde(default)]
    pub handling_points: f32,
}

impl ModDescriptor {
    pub fn new(
        key: &str,
        name: &str,
        category: ModCategory,
        hp_gain: GainRange,
        torque_gain: GainRange,
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            category,
            hp_gain,
            torque_gain,
            included_keys: Vec::new(),
            hierarchy_rank: 0,
            conflict_group: None,
            weight_delta_lb: 0.,
            handling_points: 0.,
        }
    }

    pub fn with_includes(mut self, keys: &[&str]) -> Self {
        self.included_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_rank(mut self, rank: u8) -> Self {
        self.hierarchy_rank = rank;
        self
    }

    pub fn with_conflict_group(mut self, group: ConflictGroup) -> Self {
        self.conflict_group = Some(group);
        self
    }

    pub fn with_weight_delta(mut self, lb: f32) -> Self {
        self.weight_delta_lb = lb;
        self
    }

    pub fn with_handling_points(mut self, points: f32) -> Self {
        self.handling_points = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_range_interpolation() {
        let range = GainRange::new(10., 20.);
        assert_eq!(range.at(0.), 10.);
        assert_eq!(range.at(0.5), 15.);
        assert_eq!(range.at(1.), 20.);
        // out-of-range interpolation points clamp
        assert_eq!(range.at(-1.), 10.);
        assert_eq!(range.at(2.), 20.);
    }

    #[test]
    fn test_gain_range_validity() {
        assert!(GainRange::new(10., 15.).is_valid());
        assert!(GainRange::ZERO.is_valid());
        assert!(!GainRange::new(15., 10.).is_valid());
        assert!(!GainRange::new(f32::NAN, 10.).is_valid());
        assert!(!GainRange::new(0., f32::INFINITY).is_valid());
    }

    #[test]
    fn test_turbo_families_respond_more_to_tunes() {
        for turbo in [
            EngineFamily::TurboInline4,
            EngineFamily::TurboInline6,
            EngineFamily::TurboV6,
            EngineFamily::TurboFlat6,
        ] {
            for na in [EngineFamily::NaInline4, EngineFamily::NaV6, EngineFamily::NaV8] {
                assert!(
                    turbo.response_multiplier(ModCategory::Tune)
                        > na.response_multiplier(ModCategory::Tune),
                    "{turbo:?} should out-respond {na:?} on tunes"
                );
            }
        }
    }

    #[test]
    fn test_chassis_categories_ignore_engine_family() {
        for family in [EngineFamily::TurboInline4, EngineFamily::NaV8] {
            assert_eq!(family.response_multiplier(ModCategory::Suspension), 1.0);
            assert_eq!(family.response_multiplier(ModCategory::Weight), 1.0);
            assert_eq!(family.response_multiplier(ModCategory::Brakes), 1.0);
        }
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ModDescriptor::new(
            "big-turbo",
            "Big Turbo Kit",
            ModCategory::Turbo,
            GainRange::new(80., 120.),
            GainRange::new(70., 110.),
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::TurboHardware)
        .with_weight_delta(12.);

        assert_eq!(descriptor.key, "big-turbo");
        assert_eq!(descriptor.hierarchy_rank, 2);
        assert_eq!(descriptor.conflict_group, Some(ConflictGroup::TurboHardware));
        assert_eq!(descriptor.weight_delta_lb, 12.);
        assert!(descriptor.included_keys.is_empty());
    }
}
