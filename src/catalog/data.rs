// Built-in modification catalog
//
// Gain ranges are quoted crank figures for a typical mid-size turbocharged
// platform; advanced aggregation rescales them per engine family. The
// inclusion edges mirror what staged packages actually bundle.

use super::types::{ConflictGroup, GainRange, ModCategory, ModDescriptor};

pub(super) fn builtin_descriptors() -> Vec<ModDescriptor> {
    vec![
        // Intake
        ModDescriptor::new(
            "cold-air-intake",
            "Cold Air Intake",
            ModCategory::Intake,
            GainRange::new(10., 15.),
            GainRange::new(8., 12.),
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::IntakeSystem),
        ModDescriptor::new(
            "high-flow-filter",
            "High-Flow Drop-In Filter",
            ModCategory::Intake,
            GainRange::new(3., 6.),
            GainRange::new(2., 5.),
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::IntakeSystem),
        // Exhaust
        ModDescriptor::new(
            "downpipe",
            "Catted Downpipe",
            ModCategory::Exhaust,
            GainRange::new(10., 20.),
            GainRange::new(10., 18.),
        )
        .with_rank(1),
        ModDescriptor::new(
            "catback-exhaust",
            "Cat-Back Exhaust",
            ModCategory::Exhaust,
            GainRange::new(8., 14.),
            GainRange::new(6., 12.),
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::ExhaustSystem)
        .with_weight_delta(-15.),
        ModDescriptor::new(
            "turboback-exhaust",
            "Turbo-Back Exhaust",
            ModCategory::Exhaust,
            GainRange::new(15., 25.),
            GainRange::new(12., 22.),
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::ExhaustSystem)
        .with_includes(&["downpipe"])
        .with_weight_delta(-22.),
        // Forced induction hardware
        ModDescriptor::new(
            "intercooler",
            "Front-Mount Intercooler",
            ModCategory::Intercooler,
            GainRange::new(5., 12.),
            GainRange::new(8., 15.),
        )
        .with_rank(1)
        .with_weight_delta(8.),
        ModDescriptor::new(
            "turbo-upgrade",
            "Stock-Frame Turbo Upgrade",
            ModCategory::Turbo,
            GainRange::new(40., 60.),
            GainRange::new(35., 55.),
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::TurboHardware)
        .with_weight_delta(5.),
        ModDescriptor::new(
            "big-turbo",
            "Big Turbo Kit",
            ModCategory::Turbo,
            GainRange::new(80., 120.),
            GainRange::new(70., 110.),
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::TurboHardware)
        .with_weight_delta(12.),
        // Fueling
        ModDescriptor::new(
            "e85-conversion",
            "E85 Flex Fuel Conversion",
            ModCategory::Fueling,
            GainRange::new(25., 40.),
            GainRange::new(20., 35.),
        )
        .with_rank(1),
        // Staged calibrations
        ModDescriptor::new(
            "stage1-tune",
            "Stage 1 Tune",
            ModCategory::Tune,
            GainRange::new(25., 45.),
            GainRange::new(30., 50.),
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::TuneStage),
        ModDescriptor::new(
            "stage2-tune",
            "Stage 2 Tune",
            ModCategory::Tune,
            GainRange::new(50., 75.),
            GainRange::new(55., 85.),
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::TuneStage)
        .with_includes(&["downpipe", "intercooler"]),
        ModDescriptor::new(
            "stage3-tune",
            "Stage 3 Tune",
            ModCategory::Tune,
            GainRange::new(90., 130.),
            GainRange::new(95., 140.),
        )
        .with_rank(3)
        .with_conflict_group(ConflictGroup::TuneStage)
        .with_includes(&["downpipe", "cold-air-intake", "turbo-upgrade", "intercooler"]),
        // Suspension
        ModDescriptor::new(
            "coilovers",
            "Adjustable Coilovers",
            ModCategory::Suspension,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::SuspensionKit)
        .with_handling_points(6.)
        .with_weight_delta(-10.),
        ModDescriptor::new(
            "lowering-springs",
            "Lowering Springs",
            ModCategory::Suspension,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::SuspensionKit)
        .with_handling_points(3.)
        .with_weight_delta(-4.),
        ModDescriptor::new(
            "sway-bars",
            "Adjustable Sway Bars",
            ModCategory::Suspension,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(3.),
        // Brakes
        ModDescriptor::new(
            "big-brake-kit",
            "Big Brake Kit",
            ModCategory::Brakes,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(2)
        .with_conflict_group(ConflictGroup::BrakeKit)
        .with_handling_points(5.)
        .with_weight_delta(10.),
        ModDescriptor::new(
            "performance-pads",
            "Performance Brake Pads",
            ModCategory::Brakes,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_conflict_group(ConflictGroup::BrakeKit)
        .with_handling_points(2.),
        // Weight
        ModDescriptor::new(
            "weight-reduction",
            "Interior Weight Reduction",
            ModCategory::Weight,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(2.)
        .with_weight_delta(-180.),
        ModDescriptor::new(
            "carbon-hood",
            "Carbon Fiber Hood",
            ModCategory::Weight,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(1.)
        .with_weight_delta(-25.),
        // Wheels
        ModDescriptor::new(
            "lightweight-wheels",
            "Lightweight Forged Wheels",
            ModCategory::Wheels,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(4.)
        .with_weight_delta(-32.),
        // Aero
        ModDescriptor::new(
            "rear-wing",
            "Rear Wing",
            ModCategory::Aero,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(4.)
        .with_weight_delta(12.),
        ModDescriptor::new(
            "front-splitter",
            "Front Splitter",
            ModCategory::Aero,
            GainRange::ZERO,
            GainRange::ZERO,
        )
        .with_rank(1)
        .with_handling_points(3.)
        .with_weight_delta(6.),
    ]
}
