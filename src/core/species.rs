//! Species profile table.
//!
//! Per-species tolerance envelopes. Adding a species is a data change: either extend
//! [`SpeciesTable::builtin`] or supply `[[profiles]]` entries in the configuration file.

use crate::utils::error::{AlgaeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optimum and tolerance of one environmental factor. Only constructed through
/// [`SpeciesProfile::new`], which guarantees `tolerance > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorEnvelope {
    optimum: f64,
    tolerance: f64,
}

impl FactorEnvelope {
    pub fn optimum(&self) -> f64 {
        self.optimum
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// Flat, unvalidated profile as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub id: String,
    pub temp_optimum: f64,
    pub temp_tolerance: f64,
    pub nutrient_optimum: f64,
    pub nutrient_tolerance: f64,
    pub sunlight_optimum: f64,
    pub sunlight_tolerance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesProfile {
    id: String,
    temperature: FactorEnvelope,
    nutrient: FactorEnvelope,
    sunlight: FactorEnvelope,
}

fn envelope(species: &str, field: &str, optimum: f64, tolerance: f64) -> Result<FactorEnvelope> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(AlgaeError::InvalidProfile {
            species: species.to_string(),
            field: format!("{}_tolerance", field),
            value: tolerance,
        });
    }
    if !optimum.is_finite() {
        return Err(AlgaeError::InvalidProfile {
            species: species.to_string(),
            field: format!("{}_optimum", field),
            value: optimum,
        });
    }
    Ok(FactorEnvelope { optimum, tolerance })
}

impl SpeciesProfile {
    pub fn new(spec: ProfileSpec) -> Result<Self> {
        crate::utils::validation::validate_non_empty_string("profiles.id", &spec.id)?;
        let temperature = envelope(&spec.id, "temp", spec.temp_optimum, spec.temp_tolerance)?;
        let nutrient = envelope(
            &spec.id,
            "nutrient",
            spec.nutrient_optimum,
            spec.nutrient_tolerance,
        )?;
        let sunlight = envelope(
            &spec.id,
            "sunlight",
            spec.sunlight_optimum,
            spec.sunlight_tolerance,
        )?;
        Ok(Self {
            id: spec.id,
            temperature,
            nutrient,
            sunlight,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn temperature(&self) -> &FactorEnvelope {
        &self.temperature
    }

    pub fn nutrient(&self) -> &FactorEnvelope {
        &self.nutrient
    }

    pub fn sunlight(&self) -> &FactorEnvelope {
        &self.sunlight
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    profiles: Vec<SpeciesProfile>,
    index: HashMap<String, usize>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three lagoon species the model was tuned for.
    pub fn builtin() -> Self {
        let specs = [
            ("Ulva lactuca", 30.0, 25.0, 3.0, 5.0, 6.0, 8.0),
            ("Hypnea musciformis", 28.0, 24.0, 2.8, 4.0, 7.0, 8.0),
            ("Caulerpa racemosa", 32.0, 24.0, 4.0, 4.5, 5.0, 6.0),
        ];
        let mut table = Self::new();
        for (id, t_opt, t_tol, n_opt, n_tol, s_opt, s_tol) in specs {
            table.insert(SpeciesProfile {
                id: id.to_string(),
                temperature: FactorEnvelope {
                    optimum: t_opt,
                    tolerance: t_tol,
                },
                nutrient: FactorEnvelope {
                    optimum: n_opt,
                    tolerance: n_tol,
                },
                sunlight: FactorEnvelope {
                    optimum: s_opt,
                    tolerance: s_tol,
                },
            });
        }
        table
    }

    /// Adds a profile, replacing any existing profile with the same id in place.
    pub fn insert(&mut self, profile: SpeciesProfile) {
        match self.index.get(profile.id()) {
            Some(&i) => self.profiles[i] = profile,
            None => {
                self.index
                    .insert(profile.id().to_string(), self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    pub fn extend_from_specs<I>(&mut self, specs: I) -> Result<()>
    where
        I: IntoIterator<Item = ProfileSpec>,
    {
        for spec in specs {
            self.insert(SpeciesProfile::new(spec)?);
        }
        Ok(())
    }

    pub fn get(&self, species_id: &str) -> Result<&SpeciesProfile> {
        self.index
            .get(species_id)
            .map(|&i| &self.profiles[i])
            .ok_or_else(|| AlgaeError::UnknownSpecies {
                species: species_id.to_string(),
            })
    }

    /// Resolves every requested id, failing on the first unknown one.
    pub fn select<S: AsRef<str>>(&self, species_ids: &[S]) -> Result<Vec<SpeciesProfile>> {
        species_ids
            .iter()
            .map(|id| self.get(id.as_ref()).cloned())
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.id())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str, temp_tolerance: f64) -> ProfileSpec {
        ProfileSpec {
            id: id.to_string(),
            temp_optimum: 25.0,
            temp_tolerance,
            nutrient_optimum: 2.0,
            nutrient_tolerance: 3.0,
            sunlight_optimum: 6.0,
            sunlight_tolerance: 5.0,
        }
    }

    #[test]
    fn test_builtin_table_has_lagoon_species() {
        let table = SpeciesTable::builtin();
        assert_eq!(table.len(), 3);

        let ulva = table.get("Ulva lactuca").unwrap();
        assert_eq!(ulva.temperature().optimum(), 30.0);
        assert_eq!(ulva.temperature().tolerance(), 25.0);
        assert_eq!(ulva.nutrient().optimum(), 3.0);
        assert_eq!(ulva.nutrient().tolerance(), 5.0);
        assert_eq!(ulva.sunlight().optimum(), 6.0);
        assert_eq!(ulva.sunlight().tolerance(), 8.0);

        let caulerpa = table.get("Caulerpa racemosa").unwrap();
        assert_eq!(caulerpa.sunlight().tolerance(), 6.0);
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let table = SpeciesTable::builtin();
        let err = table.get("Gracilaria verrucosa").unwrap_err();
        assert!(matches!(err, AlgaeError::UnknownSpecies { species } if species == "Gracilaria verrucosa"));
    }

    #[test]
    fn test_non_positive_tolerance_rejected_at_construction() {
        for bad in [0.0, -3.0, f64::NAN] {
            let err = SpeciesProfile::new(spec("Broken", bad)).unwrap_err();
            assert!(
                matches!(err, AlgaeError::InvalidProfile { ref field, .. } if field == "temp_tolerance")
            );
        }
    }

    #[test]
    fn test_insert_replaces_existing_profile_in_place() {
        let mut table = SpeciesTable::builtin();
        let mut replacement = spec("Ulva lactuca", 10.0);
        replacement.temp_optimum = 27.0;
        table.extend_from_specs([replacement, spec("Gracilaria", 20.0)]).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("Ulva lactuca").unwrap().temperature().optimum(), 27.0);
        let ids: Vec<&str> = table.ids().collect();
        assert_eq!(ids[0], "Ulva lactuca");
        assert_eq!(ids[3], "Gracilaria");
    }

    #[test]
    fn test_select_preserves_requested_order() {
        let table = SpeciesTable::builtin();
        let selected = table
            .select(&["Caulerpa racemosa", "Ulva lactuca"])
            .unwrap();
        assert_eq!(selected[0].id(), "Caulerpa racemosa");
        assert_eq!(selected[1].id(), "Ulva lactuca");

        assert!(table.select(&["Ulva lactuca", "Nope"]).is_err());
    }
}
