// Immutable keyed catalog and selection resolution

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use itertools::Itertools;

use crate::errors::ModdynoError;

use super::types::ModDescriptor;

/// The modification catalog: a validated, immutable lookup table built once
/// at startup.
#[derive(Debug)]
pub struct ModCatalog {
    descriptors: HashMap<String, ModDescriptor>,
}

/// Result of resolving a caller's selected keys against the catalog.
///
/// Descriptor order follows the caller's input order (last occurrence wins
/// for duplicated keys); downstream conflict tie-breaking depends on it.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub descriptors: Vec<&'a ModDescriptor>,
    pub unknown_keys: Vec<String>,
}

impl ModCatalog {
    /// Build the catalog that ships with the crate.
    pub fn builtin() -> Self {
        Self::from_descriptors(super::data::builtin_descriptors())
            .expect("built-in catalog must be valid")
    }

    /// Build a catalog from descriptors, validating key uniqueness, gain
    /// ranges, and that every inclusion edge points at a known descriptor.
    pub fn from_descriptors(descriptors: Vec<ModDescriptor>) -> Result<Self, ModdynoError> {
        let mut map: HashMap<String, ModDescriptor> = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if !descriptor.hp_gain.is_valid()
                || !descriptor.torque_gain.is_valid()
                || !descriptor.weight_delta_lb.is_finite()
                || !descriptor.handling_points.is_finite()
            {
                return Err(ModdynoError::InvalidGainRange {
                    key: descriptor.key.clone(),
                });
            }
            if map.insert(descriptor.key.clone(), descriptor.clone()).is_some() {
                return Err(ModdynoError::DuplicateCatalogKey {
                    key: descriptor.key,
                });
            }
        }
        for descriptor in map.values() {
            for included in &descriptor.included_keys {
                if !map.contains_key(included) {
                    return Err(ModdynoError::UnknownIncludedKey {
                        key: included.clone(),
                        included_by: descriptor.key.clone(),
                    });
                }
            }
        }
        Ok(Self { descriptors: map })
    }

    /// Load a versioned catalog from a JSON file (an array of descriptors).
    pub fn from_json_file(path: &Path) -> Result<Self, ModdynoError> {
        let file = File::open(path).map_err(|e| ModdynoError::CatalogIOError { source: e })?;
        let descriptors: Vec<ModDescriptor> = serde_json::from_reader(file)
            .map_err(|e| ModdynoError::CatalogParseError { source: e })?;
        Self::from_descriptors(descriptors)
    }

    pub fn get(&self, key: &str) -> Option<&ModDescriptor> {
        self.descriptors.get(key)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Resolve selected keys into descriptors. A pure map read: unknown keys
    /// are reported, never an error, so one bad key cannot abort the rest of
    /// the build. Duplicate keys collapse to their last occurrence so the
    /// "most recently selected" tie-break stays well defined.
    pub fn resolve(&self, keys: &[String]) -> Resolution<'_> {
        let mut last_position: HashMap<&str, usize> = HashMap::new();
        for (position, key) in keys.iter().enumerate() {
            last_position.insert(key.as_str(), position);
        }

        let mut descriptors = Vec::new();
        let mut unknown_keys = Vec::new();
        for (key, _) in last_position
            .into_iter()
            .sorted_by_key(|(_, position)| *position)
        {
            match self.descriptors.get(key) {
                Some(descriptor) => descriptors.push(descriptor),
                None => {
                    log::debug!("unknown modification key: {key}");
                    unknown_keys.push(key.to_string());
                }
            }
        }

        Resolution {
            descriptors,
            unknown_keys,
        }
    }
}
