// Lap data records and the data-source seam
//
// The estimator never performs I/O itself: real recorded laps, professional
// reference laps, and similar-vehicle data arrive through `LapDataSource`,
// owned by the caller's data-access layer. `InMemoryLapData` is the shipped
// implementation, loadable from a JSONL dataset.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_jsonlines::json_lines;

use crate::catalog::DriveType;
use crate::errors::ModdynoError;

/// Vehicle class buckets used to match reference and similar-vehicle data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleClass {
    Compact,
    SportCompact,
    Sports,
    Muscle,
    Supercar,
    Track,
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleClass::Compact => write!(f, "Compact"),
            VehicleClass::SportCompact => write!(f, "Sport Compact"),
            VehicleClass::Sports => write!(f, "Sports"),
            VehicleClass::Muscle => write!(f, "Muscle"),
            VehicleClass::Supercar => write!(f, "Supercar"),
            VehicleClass::Track => write!(f, "Track"),
        }
    }
}

/// One real recorded lap for a car/track combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapRecord {
    pub track_id: String,
    pub car_id: String,
    pub lap_time_s: f32,
}

/// A professional reference lap for a track and vehicle class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceLap {
    pub track_id: String,
    pub vehicle_class: VehicleClass,
    pub lap_time_s: f32,
    /// Power and weight of the reference vehicle, for power-to-weight scaling
    pub hp: f32,
    pub weight_lb: f32,
}

/// Best established lap of a structurally similar vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarVehicleLap {
    pub track_id: String,
    pub car_id: String,
    pub vehicle_class: VehicleClass,
    pub drive_type: DriveType,
    pub lap_time_s: f32,
    pub hp: f32,
    pub weight_lb: f32,
}

/// One line of a lap dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LapDataEntry {
    Record(LapRecord),
    Reference(ReferenceLap),
    Similar(SimilarVehicleLap),
}

/// Read-only access to lap statistics, owned by the data-access layer.
pub trait LapDataSource {
    /// Real recorded lap times for this exact car/track combination.
    fn recorded_laps(&self, track_id: &str, car_id: &str) -> Vec<f32>;

    /// A professional reference lap for the track and vehicle class, if one
    /// exists.
    fn reference_lap(&self, track_id: &str, class: VehicleClass) -> Option<ReferenceLap>;

    /// An established lap from a vehicle of the same class and drivetrain.
    fn similar_vehicle_lap(
        &self,
        track_id: &str,
        class: VehicleClass,
        drive_type: DriveType,
    ) -> Option<SimilarVehicleLap>;
}

/// In-memory lap dataset.
#[derive(Debug, Default)]
pub struct InMemoryLapData {
    records: Vec<LapRecord>,
    references: Vec<ReferenceLap>,
    similar: Vec<SimilarVehicleLap>,
}

impl InMemoryLapData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LapDataEntry>) -> Self {
        let mut data = Self::new();
        for entry in entries {
            data.push(entry);
        }
        data
    }

    /// Load a JSONL dataset where each line is a [`LapDataEntry`].
    pub fn from_jsonl_file(path: &Path) -> Result<Self, ModdynoError> {
        let entries = json_lines::<LapDataEntry, _>(path)
            .map_err(|e| ModdynoError::LapDataIOError { source: e })?
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| ModdynoError::LapDataIOError { source: e })?;
        log::debug!("loaded {} lap data entries from file", entries.len());
        Ok(Self::from_entries(entries))
    }

    pub fn push(&mut self, entry: LapDataEntry) {
        match entry {
            LapDataEntry::Record(record) => self.records.push(record),
            LapDataEntry::Reference(reference) => self.references.push(reference),
            LapDataEntry::Similar(similar) => self.similar.push(similar),
        }
    }
}

impl LapDataSource for InMemoryLapData {
    fn recorded_laps(&self, track_id: &str, car_id: &str) -> Vec<f32> {
        self.records
            .iter()
            .filter(|r| r.track_id == track_id && r.car_id == car_id)
            .map(|r| r.lap_time_s)
            .collect()
    }

    fn reference_lap(&self, track_id: &str, class: VehicleClass) -> Option<ReferenceLap> {
        self.references
            .iter()
            .find(|r| r.track_id == track_id && r.vehicle_class == class)
            .cloned()
    }

    fn similar_vehicle_lap(
        &self,
        track_id: &str,
        class: VehicleClass,
        drive_type: DriveType,
    ) -> Option<SimilarVehicleLap> {
        self.similar
            .iter()
            .find(|s| {
                s.track_id == track_id && s.vehicle_class == class && s.drive_type == drive_type
            })
            .cloned()
    }
}
